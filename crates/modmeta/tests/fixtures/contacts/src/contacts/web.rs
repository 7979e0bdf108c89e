use actix_web::{get, post};
use modmeta::{auto_route, belongs_to_module};

#[belongs_to_module("Contacts")]
#[actix_web::route("api/[controller]")]
pub struct ContactsController;

impl ContactsController {
    #[get]
    #[auto_route(required_permission = "Contacts.Read")]
    pub async fn list(&self) {}

    #[post]
    #[auto_route(required_permission = "Contacts.Write")]
    pub async fn create(&self) {}

    pub fn helper(&self) {}
}
