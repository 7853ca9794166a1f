//! The merged graph of a federated schema composition, and the two SDL renderings of it: the
//! federated (supergraph) SDL with all the join metadata the query planner needs, and the API
//! SDL exposed to clients.

mod federated_graph;
mod render_sdl;
mod wrapping;

pub use self::{
    federated_graph::*,
    render_sdl::{render_api_sdl, render_federated_sdl},
    wrapping::{ListWrapping, Wrapping, MAX_LIST_DEPTH},
};

#[cfg(test)]
use {indoc as _, insta as _, pretty_assertions as _, serde_json as _};
