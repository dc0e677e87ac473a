pub mod fundamental_data_repo;
pub mod fundamental_data_type_repo;

pub use fundamental_data_repo::{
    AvailabilityRow, FundamentalDataFilter, FundamentalDataRepository, NewFundamentalData,
    INSERT_CHUNK_ROWS,
};
pub use fundamental_data_type_repo::FundamentalDataTypeRepository;
