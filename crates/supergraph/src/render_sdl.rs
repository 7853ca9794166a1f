mod display_utils;
mod render_api_sdl;
mod render_federated_sdl;

pub use self::{render_api_sdl::render_api_sdl, render_federated_sdl::render_federated_sdl};
