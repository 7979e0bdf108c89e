use modmeta::{auto_route, belongs_to_module};

// No module anchor anywhere: the manifest is synthesized.
#[belongs_to_module("Inventory")]
#[route("api/stock")]
pub struct StockController;

impl StockController {
    #[get("adjust")]
    #[auto_route(method_override = "POST", required_permission = "Inventory.Write")]
    pub async fn adjust(&self) {}
}
