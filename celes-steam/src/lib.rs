//! Remote canonical-metadata access for Steam: the cached schema
//! provider and the public-profile client.

pub mod profile;
pub mod schema;

pub use profile::{OwnedGame, ProfileLookup, SteamCommunityClient};
pub use schema::SteamSchemaProvider;
