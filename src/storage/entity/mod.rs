pub mod fundamental_data;
pub mod fundamental_data_type;
pub mod sea_orm_active_enums;

pub use fundamental_data::Entity as FundamentalData;
pub use fundamental_data_type::Entity as FundamentalDataType;
pub use sea_orm_active_enums::{PeriodType, StatementType};
