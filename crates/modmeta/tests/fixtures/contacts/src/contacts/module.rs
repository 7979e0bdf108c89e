use modmeta::{depends_on, module, permissions, publishes_events, setting};

/// Address book
#[derive(Debug, Default)]
#[module(name = "Contacts", display_name = "Contacts", version = "1.0.0", description = "Address book")]
#[permissions(["Contacts.Read", "Contacts.Write"])]
#[publishes_events("ContactCreated")]
#[depends_on("Identity", ">=1.0.0")]
pub struct ContactsModule {
    #[setting("Contacts.DefaultPageSize", SettingType::Int, default_value = "25")]
    pub page_size: u32,
}

impl ContactsModule {
    #[modmeta::module_route("get", "/api/contacts/export", required_permission = "Contacts.Read")]
    pub fn export() {}
}
