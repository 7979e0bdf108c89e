pub mod contacts;
pub mod inventory;

include!(concat!(env!("OUT_DIR"), "/modmeta_manifests.rs"));
