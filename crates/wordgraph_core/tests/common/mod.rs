#![allow(dead_code)]

use wordgraph_core::{
    CallContext, Engine, EngineConfig, Graph, LinkFields, NewGraph, Profile, Word, WordFields,
};

pub fn engine() -> Engine {
    Engine::open_in_memory(EngineConfig::default()).unwrap()
}

pub fn member(id: &str) -> CallContext {
    CallContext::new(Profile::member(id))
}

pub fn moderator(id: &str) -> CallContext {
    CallContext::new(Profile::moderator(id))
}

pub fn admin(id: &str) -> CallContext {
    CallContext::new(Profile::admin(id))
}

pub fn graph(engine: &Engine, ctx: &CallContext, name: &str) -> Graph {
    engine
        .graphs()
        .unwrap()
        .create_graph(ctx, &NewGraph::new(name))
        .unwrap()
}

pub fn word(engine: &Engine, ctx: &CallContext, graph: &Graph, content: &str) -> Word {
    engine
        .words()
        .unwrap()
        .create_word(ctx, graph.id, &WordFields::new(content))
        .unwrap()
}

pub fn link(engine: &Engine, ctx: &CallContext, a: &Word, b: &Word, label: &str) -> uuid::Uuid {
    engine
        .links()
        .unwrap()
        .create_link(ctx, a.id, b.id, &LinkFields::new(label))
        .unwrap()
        .link
        .id
}
