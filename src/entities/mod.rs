pub mod client;
pub mod delivery_note;
pub mod delivery_note_item;
pub mod invoice;
pub mod invoice_item;
pub mod product;
pub mod proforma;
pub mod proforma_item;
pub mod user;

pub use client::Entity as Client;
pub use delivery_note::Entity as DeliveryNote;
pub use delivery_note_item::Entity as DeliveryNoteItem;
pub use invoice::Entity as Invoice;
pub use invoice_item::Entity as InvoiceItem;
pub use product::Entity as Product;
pub use proforma::Entity as Proforma;
pub use proforma_item::Entity as ProformaItem;
pub use user::Entity as User;
