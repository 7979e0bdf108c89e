mod module;
mod web;

pub use module::ContactsModule;
pub use web::ContactsController;
