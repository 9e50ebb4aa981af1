//! Stream handler implementations.

pub mod account_wishlists;
pub mod fixture;

pub use account_wishlists::{AccountWishlists, InMemoryWishlistApi, WishlistApi};
pub use fixture::FixtureStreamHandler;
