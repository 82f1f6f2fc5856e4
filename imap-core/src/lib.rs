pub mod gateways;
pub mod repositories;
pub mod usecases;
pub mod util;

pub mod entities {
    pub use imap_entities::{comment::*, geo::*, id::*, report::*, time::*};
}
