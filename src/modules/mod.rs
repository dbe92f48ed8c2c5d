//! Catalog resources, one module per entity plus the landing page.

pub mod authors;
pub mod bookinstances;
pub mod books;
pub mod genres;
pub mod home;

use std::sync::Arc;

use libris_kernel::ModuleRegistry;

/// Register every catalog module with the registry
pub fn register_all(registry: &mut ModuleRegistry) {
    registry.register(Arc::new(home::HomeModule::new()));
    registry.register(Arc::new(genres::GenresModule::new()));
    registry.register(Arc::new(authors::AuthorsModule::new()));
    registry.register(Arc::new(books::BooksModule::new()));
    registry.register(Arc::new(bookinstances::BookInstancesModule::new()));
}
