pub mod memory;
pub mod store;
pub mod supabase;

pub use memory::InMemoryStore;
pub use store::{AppointmentStore, StoreError};
pub use supabase::SupabaseStore;
