//! A model source builds exactly once, no matter how many threads ask first.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use entitymodel::prelude::*;

fn blog_post(b: &mut ModelBuilder) -> Result<()> {
    b.entity("Blog")?;
    b.property("Blog", "Id", ValueType::Int32, false)?;
    b.primary_key("Blog", &["Id"])?;
    b.generate_value_on_add("Blog", "Id", true)?;

    b.entity("Post")?;
    b.property("Post", "Id", ValueType::Int32, false)?;
    b.property("Post", "BlogId", ValueType::Int32, false)?;
    b.primary_key("Post", &["Id"])?;
    b.foreign_key("Post", &["BlogId"], "Blog", &["Id"])?;
    Ok(())
}

#[test]
fn model_is_built_once_across_threads() {
    let builds = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&builds);
    let source = ModelSource::new(move |b| {
        counter.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        blog_post(b)
    });

    let models: Vec<Arc<Model>> = thread::scope(|s| {
        let handles: Vec<_> = (0..10).map(|_| s.spawn(|| source.model())).collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("builder thread").expect("model builds"))
            .collect()
    });

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert!(models.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn built_model_resolves_generation() {
    let source = ModelSource::new(blog_post);
    let model = source.model().unwrap();

    let blog = model.find_entity_type("Blog").unwrap();
    let post = model.find_entity_type("Post").unwrap();
    let blog_id = model.find_property(blog, "Id").unwrap();
    let post_blog_id = model.find_property(post, "BlogId").unwrap();
    let post_id = model.find_property(post, "Id").unwrap();

    assert_eq!(model.generation_property(post_blog_id), Some(blog_id));
    assert_eq!(model.generation_property(post_id), None);
}

#[test]
fn construction_error_surfaces_from_source() {
    let source = ModelSource::new(|b| {
        blog_post(b)?;
        b.property("Blog", "Id", ValueType::Int64, true)?;
        Ok(())
    });

    let err = source.model().unwrap_err();
    assert_eq!(
        err.to_string(),
        "construction error: duplicate name 'Id' in Blog"
    );
    assert!(source.is_built());
}

#[test]
fn described_model_round_trips_through_json_text() {
    let source = ModelSource::new(blog_post);
    let model = source.model().unwrap();

    let text = serde_json::to_string(&model.describe()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let post = &value["entity_types"][1];
    assert_eq!(post["name"], "Post");
    assert_eq!(post["foreign_keys"][0]["properties"][0], "BlogId");
    assert_eq!(post["foreign_keys"][0]["principal_entity"], "Blog");
}
