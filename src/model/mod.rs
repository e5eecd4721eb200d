mod amount;
mod bank_account;
mod category;
mod day;
mod invoice;
mod party;
mod product;
mod profile;
mod table;
mod transaction;

pub use amount::{embedded_name, Amount, Embedded, NameRef};
pub use bank_account::BankAccount;
pub use category::{Category, EntryKind};
pub use day::{day_of, deserialize_day};
pub use invoice::{Counterparty, Invoice, InvoiceItem, PaymentStatus};
pub use party::{Customer, Party, Supplier};
pub use product::Product;
pub use profile::{Profile, UserRole};
pub use table::Table;
pub use transaction::{PaymentMethod, Transaction};
