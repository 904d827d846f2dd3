//! Term repository implementations.

#[cfg(test)]
mod mock;
mod postgres;

#[cfg(test)]
pub use mock::MockTermRepository;
pub use postgres::PgTermRepository;
