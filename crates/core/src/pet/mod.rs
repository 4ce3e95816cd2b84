//! Pets owned by customers.

mod service;
mod types;


#[cfg(test)]
pub use service::MockPetRepository;
pub use service::{PetRepository, PetService};
pub use types::{NewPet, Pet, PetChanges, PetPayload, PetView};
