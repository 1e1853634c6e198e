pub mod memory;
pub mod state;
pub mod store;
pub mod supabase;

pub use memory::InMemoryClinicStore;
pub use state::AppState;
pub use store::{ClinicStore, StoreError, StoreResult};
pub use supabase::{SupabaseClient, SupabaseClinicStore, SupabaseError};
