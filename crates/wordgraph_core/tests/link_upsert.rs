mod common;

use common::{admin, engine, graph, link, member, word};
use std::sync::{Arc, Barrier};
use std::thread;
use uuid::Uuid;
use wordgraph_core::{Engine, EngineConfig, LinkFields, NewGraph, ServiceError, WordFields};

#[test]
fn create_link_is_idempotent_per_unordered_pair() {
    let engine = engine();
    let alice = member("alice");
    let animals = graph(&engine, &alice, "Animals");
    let cat = word(&engine, &alice, &animals, "cat");
    let dog = word(&engine, &alice, &animals, "dog");
    let links = engine.links().unwrap();

    let first = links
        .create_link(&alice, cat.id, dog.id, &LinkFields::new("chases"))
        .unwrap();
    assert!(first.created);
    assert_eq!(first.link.owner_id, "alice");

    let again = links
        .create_link(&alice, cat.id, dog.id, &LinkFields::new("chases"))
        .unwrap();
    let reversed = links
        .create_link(
            &alice,
            dog.id,
            cat.id,
            &LinkFields::new("fights").with_description("noisy"),
        )
        .unwrap();

    assert!(!again.created);
    assert!(!reversed.created);
    assert_eq!(again.link.id, first.link.id);
    assert_eq!(reversed.link.id, first.link.id);
    assert_eq!(reversed.link.content, "fights");
    assert_eq!(reversed.link.description.as_deref(), Some("noisy"));
    assert_eq!(engine.stats().unwrap().links, 1);

    let data = engine.explore().graph_data(&alice, animals.id).unwrap();
    let bound = data
        .edges
        .iter()
        .filter(|edge| edge.link_id == Some(first.link.id))
        .count();
    assert_eq!(bound, 1);
    assert_eq!(data.edges.len(), 1);
}

#[test]
fn create_link_keeps_owner_of_existing_link() {
    let engine = engine();
    let alice = member("alice");
    let animals = graph(&engine, &alice, "Animals");
    let cat = word(&engine, &alice, &animals, "cat");
    let dog = word(&engine, &alice, &animals, "dog");
    let id = link(&engine, &alice, &cat, &dog, "chases");

    let upsert = engine
        .links()
        .unwrap()
        .create_link(&member("bob"), dog.id, cat.id, &LinkFields::new("likes"))
        .unwrap();
    assert_eq!(upsert.link.id, id);
    assert_eq!(upsert.link.owner_id, "alice");
}

#[test]
fn create_link_adopts_existing_bare_edge() {
    let engine = engine();
    let alice = member("alice");
    let animals = graph(&engine, &alice, "Animals");
    let cat = word(&engine, &alice, &animals, "cat");
    let dog = word(&engine, &alice, &animals, "dog");
    let bare = engine.words().unwrap().link_words(&alice, dog.id, cat.id).unwrap();

    let id = link(&engine, &alice, &cat, &dog, "chases");

    let data = engine.explore().graph_data(&alice, animals.id).unwrap();
    assert_eq!(data.edges.len(), 1);
    assert_eq!(data.edges[0].id, bare.id);
    assert_eq!(data.edges[0].link_id, Some(id));
}

#[test]
fn create_link_rejects_self_and_missing_words() {
    let engine = engine();
    let alice = member("alice");
    let animals = graph(&engine, &alice, "Animals");
    let cat = word(&engine, &alice, &animals, "cat");
    let links = engine.links().unwrap();

    let self_link = links
        .create_link(&alice, cat.id, cat.id, &LinkFields::new("is"))
        .unwrap_err();
    assert!(matches!(self_link, ServiceError::BadInput(_)));

    let missing = links
        .create_link(&alice, cat.id, Uuid::new_v4(), &LinkFields::new("is"))
        .unwrap_err();
    assert!(matches!(missing, ServiceError::BadInput(_)));

    let blank = links
        .create_link(&alice, cat.id, Uuid::new_v4(), &LinkFields::new(" "))
        .unwrap_err();
    assert_eq!(blank.code(), "bad_input");
    assert_eq!(engine.stats().unwrap().links, 0);
}

#[test]
fn link_lookup_is_symmetric() {
    let engine = engine();
    let alice = member("alice");
    let animals = graph(&engine, &alice, "Animals");
    let cat = word(&engine, &alice, &animals, "cat");
    let dog = word(&engine, &alice, &animals, "dog");
    let cow = word(&engine, &alice, &animals, "cow");
    let id = link(&engine, &alice, &cat, &dog, "chases");
    let links = engine.links().unwrap();

    let forward = links.get_link_by_words(&alice, cat.id, dog.id).unwrap();
    let backward = links.get_link_by_words(&alice, dog.id, cat.id).unwrap();
    assert_eq!(forward, backward);
    assert_eq!(forward.id, id);
    assert!(forward.joins(dog.id, cat.id));
    assert_eq!(links.get_link(&alice, id).unwrap(), forward);

    assert!(matches!(
        links.get_link_by_words(&alice, cat.id, cow.id).unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert!(matches!(
        links
            .get_link_by_words(&alice, cat.id, Uuid::new_v4())
            .unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert!(matches!(
        links.get_link(&alice, Uuid::new_v4()).unwrap_err(),
        ServiceError::NotFound(_)
    ));
}

#[test]
fn update_link_requires_link_owner() {
    let engine = engine();
    let alice = member("alice");
    let animals = graph(&engine, &alice, "Animals");
    let cat = word(&engine, &alice, &animals, "cat");
    let dog = word(&engine, &alice, &animals, "dog");
    let id = link(&engine, &alice, &cat, &dog, "chases");
    let links = engine.links().unwrap();

    let denied = links
        .update_link(&member("bob"), id, &LinkFields::new("ignores"))
        .unwrap_err();
    assert!(matches!(denied, ServiceError::Unauthorized(_)));

    let updated = links
        .update_link(
            &alice,
            id,
            &LinkFields::new("ignores").with_refs(["https://example.org/pets"]),
        )
        .unwrap();
    assert_eq!(updated.content, "ignores");
    assert_eq!(updated.refs, Some(vec!["https://example.org/pets".to_string()]));
    assert!(updated.updated_at.is_some());

    let missing = links
        .update_link(&alice, Uuid::new_v4(), &LinkFields::new("x"))
        .unwrap_err();
    assert!(matches!(missing, ServiceError::NotFound(_)));
}

#[test]
fn delete_link_removes_link_and_every_pair_edge() {
    let engine = engine();
    let alice = member("alice");
    let animals = graph(&engine, &alice, "Animals");
    let cat = word(&engine, &alice, &animals, "cat");
    let dog = word(&engine, &alice, &animals, "dog");
    let cow = word(&engine, &alice, &animals, "cow");
    link(&engine, &alice, &cat, &dog, "chases");
    link(&engine, &alice, &cat, &cow, "ignores");
    engine.words().unwrap().link_words(&alice, dog.id, cat.id).unwrap();
    let links = engine.links().unwrap();

    links.delete_link(&alice, dog.id, cat.id).unwrap();

    assert!(matches!(
        links.get_link_by_words(&alice, cat.id, dog.id).unwrap_err(),
        ServiceError::NotFound(_)
    ));
    let data = engine.explore().graph_data(&alice, animals.id).unwrap();
    assert_eq!(data.edges.len(), 1);
    assert!(data.edges[0].touches(cow.id));
    assert_eq!(engine.stats().unwrap().links, 1);

    links.delete_link(&alice, cat.id, dog.id).unwrap();
}

#[test]
fn delete_link_hides_foreign_and_missing_words() {
    let engine = engine();
    let alice = member("alice");
    let animals = graph(&engine, &alice, "Animals");
    let cat = word(&engine, &alice, &animals, "cat");
    let dog = word(&engine, &alice, &animals, "dog");
    link(&engine, &alice, &cat, &dog, "chases");
    let links = engine.links().unwrap();

    let foreign = links.delete_link(&member("bob"), cat.id, dog.id).unwrap_err();
    assert!(matches!(foreign, ServiceError::NotFound(_)));
    let missing = links
        .delete_link(&alice, cat.id, Uuid::new_v4())
        .unwrap_err();
    assert!(matches!(missing, ServiceError::NotFound(_)));
    let same_word = links.delete_link(&alice, cat.id, cat.id).unwrap_err();
    assert!(matches!(same_word, ServiceError::BadInput(_)));
    assert_eq!(engine.stats().unwrap().links, 1);

    links.delete_link(&admin("root"), cat.id, dog.id).unwrap();
    assert_eq!(engine.stats().unwrap().links, 0);
}

#[test]
fn concurrent_create_link_stores_exactly_one_link() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wordgraph.db");
    let alice = member("alice");

    let (cat, dog) = {
        let engine = Engine::open(&path, EngineConfig::default()).unwrap();
        let animals = engine
            .graphs()
            .unwrap()
            .create_graph(&alice, &NewGraph::new("Animals"))
            .unwrap();
        let words = engine.words().unwrap();
        let cat = words
            .create_word(&alice, animals.id, &WordFields::new("cat"))
            .unwrap();
        let dog = words
            .create_word(&alice, animals.id, &WordFields::new("dog"))
            .unwrap();
        (cat.id, dog.id)
    };

    let workers = 8;
    let barrier = Arc::new(Barrier::new(workers));
    let handles = (0..workers)
        .map(|index| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let engine = Engine::open(&path, EngineConfig::default()).unwrap();
                let ctx = member("alice");
                let (a, b) = if index % 2 == 0 { (cat, dog) } else { (dog, cat) };
                barrier.wait();
                engine
                    .links()
                    .unwrap()
                    .create_link(&ctx, a, b, &LinkFields::new(format!("label {index}")))
                    .unwrap()
            })
        })
        .collect::<Vec<_>>();

    let results = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect::<Vec<_>>();

    let first_id = results[0].link.id;
    assert!(results.iter().all(|upsert| upsert.link.id == first_id));
    assert_eq!(results.iter().filter(|upsert| upsert.created).count(), 1);

    let engine = Engine::open(&path, EngineConfig::default()).unwrap();
    assert_eq!(engine.stats().unwrap().links, 1);
    let data = engine
        .explore()
        .find_neighbors(&alice, cat, 1)
        .unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0].link_id, Some(first_id));
}
