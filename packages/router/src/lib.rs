#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

pub mod error;
pub mod events;
pub mod matcher;
pub mod navigation;
pub mod route_definition;
pub mod scheduler;

/// Thin building blocks for rendering layers.
pub mod components {
    mod link;
    pub use link::*;

    mod outlet;
    pub use outlet::*;

    mod transition;
    pub use transition::*;
}

mod contexts {
    pub(crate) mod router;
    pub use router::*;
}

mod router_cfg;
mod service;

pub use service::{EventHandler, InitialState, Router, Unsubscribe, WeakRouter};

/// A collection of useful items most applications might need.
pub mod prelude {
    pub use crate::components::*;
    pub use crate::contexts::*;
    pub use crate::error::*;
    pub use crate::events::*;
    pub use crate::matcher::{match_route, MatchedFragment, MatchedRoute, Params};
    pub use crate::navigation::*;
    pub use crate::route_definition::*;
    pub use crate::router_cfg::{RenderMode, RouterConfig};
    pub use crate::scheduler::*;
    pub use crate::service::*;

    pub use waypost_history::{History, MemoryHistory};
}

#[doc(hidden)]
pub mod exports {
    pub use http;
    pub use waypost_history;
}
