mod fakes;
mod test_db;

pub use fakes::FakePackage;
pub use test_db::TestDatabase;
