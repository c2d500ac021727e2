#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Greenhouse experience.

use greenhouse_core::TokenView;
use greenhouse_world::{query, World, Zone};

/// Produces the data an adapter needs to greet the player and draw the board.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Exposes the drop zones laid out on the interaction surface.
    #[must_use]
    pub fn zones<'world>(&self, world: &'world World) -> &'world [Zone] {
        query::zones(world)
    }

    /// Captures the token pool for presentation purposes.
    #[must_use]
    pub fn tokens(&self, world: &World) -> TokenView {
        query::token_view(world)
    }
}
