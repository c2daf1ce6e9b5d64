mod common;

use common::{engine, graph, member, word};
use wordgraph_core::db::open_db_in_memory;
use wordgraph_core::repo::graph_repo::{GraphRepository, SqliteGraphRepository};
use wordgraph_core::repo::word_repo::{SqliteWordRepository, WordRepository};
use wordgraph_core::search::fts::SqliteTextIndex;
use wordgraph_core::{
    Engine, EngineConfig, Graph, NewGraph, SearchQuery, ServiceError, TextIndex, WordFields,
};

const FILLER: [&str; 5] = ["owl", "bee", "ant", "elk", "yak"];

fn seed_filler(engine: &Engine, graph: &Graph) {
    let alice = member("alice");
    for content in FILLER {
        word(engine, &alice, graph, content);
    }
}

#[test]
fn words_matching_more_terms_rank_first() {
    let engine = engine();
    let alice = member("alice");
    let animals = graph(&engine, &alice, "Animals");
    seed_filler(&engine, &animals);
    let red = word(&engine, &alice, &animals, "red");
    let red_fox = word(&engine, &alice, &animals, "red fox");

    let hits = engine
        .explore()
        .search(&alice, &SearchQuery::new("red fox", 10))
        .unwrap();

    assert_eq!(
        hits.iter().map(|hit| hit.word.id).collect::<Vec<_>>(),
        vec![red_fox.id, red.id]
    );
    assert!(hits[0].score > hits[1].score);
}

#[test]
fn equal_scores_keep_insertion_order() {
    let engine = engine();
    let alice = member("alice");
    let animals = graph(&engine, &alice, "Animals");
    seed_filler(&engine, &animals);
    let first = word(&engine, &alice, &animals, "fox");
    let second = word(&engine, &alice, &animals, "fox");
    let third = word(&engine, &alice, &animals, "fox");

    let found = engine.explore().search_words(&alice, "fox").unwrap();
    assert_eq!(
        found.iter().map(|word| word.id).collect::<Vec<_>>(),
        vec![first.id, second.id, third.id]
    );
}

#[test]
fn description_is_searchable() {
    let engine = engine();
    let alice = member("alice");
    let animals = graph(&engine, &alice, "Animals");
    seed_filler(&engine, &animals);
    let cat = engine
        .words()
        .unwrap()
        .create_word(
            &alice,
            animals.id,
            &WordFields::new("cat").with_description("purring feline"),
        )
        .unwrap();

    let found = engine.explore().search_words(&alice, "purring").unwrap();
    assert_eq!(found, vec![cat]);
}

#[test]
fn limits_are_respected_and_non_positive_returns_nothing() {
    let engine = engine();
    let alice = member("alice");
    let animals = graph(&engine, &alice, "Animals");
    for _ in 0..15 {
        word(&engine, &alice, &animals, "fox");
    }
    let explore = engine.explore();

    assert_eq!(explore.search_words(&alice, "fox").unwrap().len(), 10);
    assert_eq!(
        explore
            .search(&alice, &SearchQuery::new("fox", 3))
            .unwrap()
            .len(),
        3
    );
    assert!(explore
        .search(&alice, &SearchQuery::new("fox", 0))
        .unwrap()
        .is_empty());
    assert!(explore
        .search(&alice, &SearchQuery::new("fox", -5))
        .unwrap()
        .is_empty());
}

#[test]
fn search_limit_is_capped_by_config() {
    let config = EngineConfig {
        search_default_limit: 2,
        search_max_limit: 4,
        ..Default::default()
    };
    let engine = Engine::open_in_memory(config).unwrap();
    let alice = member("alice");
    let animals = graph(&engine, &alice, "Animals");
    for _ in 0..6 {
        word(&engine, &alice, &animals, "fox");
    }

    let hits = engine
        .explore()
        .search(&alice, &SearchQuery::new("fox", 50))
        .unwrap();
    assert_eq!(hits.len(), 4);
    assert_eq!(engine.explore().search_words(&alice, "fox").unwrap().len(), 2);
}

#[test]
fn graph_filter_restricts_hits() {
    let engine = engine();
    let alice = member("alice");
    let animals = graph(&engine, &alice, "Animals");
    let toys = graph(&engine, &alice, "Toys");
    seed_filler(&engine, &animals);
    let fox = word(&engine, &alice, &animals, "fox");
    word(&engine, &alice, &toys, "fox");

    let hits = engine
        .explore()
        .search(&alice, &SearchQuery::new("fox", 10).in_graph(animals.id))
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].word.id, fox.id);
}

#[test]
fn free_text_punctuation_never_fails() {
    let engine = engine();
    let alice = member("alice");
    let animals = graph(&engine, &alice, "Animals");
    seed_filler(&engine, &animals);
    let fox = word(&engine, &alice, &animals, "fox");
    let explore = engine.explore();

    let found = explore.search_words(&alice, "\"fox\" AND (").unwrap();
    assert_eq!(found.iter().map(|w| w.id).collect::<Vec<_>>(), vec![fox.id]);
    assert!(explore.search_words(&alice, "   ").unwrap().is_empty());
    assert!(explore.search_words(&alice, "*()").unwrap().is_empty());
}

#[test]
fn raw_syntax_errors_are_bad_input() {
    let engine = engine();
    let alice = member("alice");
    let animals = graph(&engine, &alice, "Animals");
    word(&engine, &alice, &animals, "fox");

    let err = engine
        .explore()
        .search(&alice, &SearchQuery::new("fox AND", 10).raw())
        .unwrap_err();
    assert!(matches!(err, ServiceError::BadInput(_)));

    let hits = engine
        .explore()
        .search(&alice, &SearchQuery::new("fo*", 10).raw())
        .unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn updates_and_deletes_are_reflected_in_search() {
    let engine = engine();
    let alice = member("alice");
    let animals = graph(&engine, &alice, "Animals");
    seed_filler(&engine, &animals);
    let fox = word(&engine, &alice, &animals, "fox");
    let words = engine.words().unwrap();
    let explore = engine.explore();

    words
        .update_word(&alice, fox.id, &WordFields::new("wolf"))
        .unwrap();
    assert!(explore.search_words(&alice, "fox").unwrap().is_empty());
    assert_eq!(explore.search_words(&alice, "wolf").unwrap().len(), 1);

    words.delete_word(&alice, fox.id).unwrap();
    assert!(explore.search_words(&alice, "wolf").unwrap().is_empty());
}

#[test]
fn rebuild_keeps_index_consistent() {
    let conn = open_db_in_memory().unwrap();
    let graphs = SqliteGraphRepository::try_new(&conn).unwrap();
    let words = SqliteWordRepository::try_new(&conn).unwrap();
    let animals = graphs
        .create_graph("alice", &NewGraph::new("Animals"), "3d")
        .unwrap();
    for content in FILLER {
        words
            .create_word(animals.id, "alice", &WordFields::new(content), None)
            .unwrap();
    }
    let fox = words
        .create_word(animals.id, "alice", &WordFields::new("fox"), None)
        .unwrap();

    let index = SqliteTextIndex::new(&conn);
    index.rebuild().unwrap();

    let hits = index.search(&SearchQuery::new("fox", 10)).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].word, fox);
}
