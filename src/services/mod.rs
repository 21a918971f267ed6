pub mod data_source;
pub mod mock_data;
pub mod query;
pub mod upstream;

pub use data_source::{
    CiDataSource, DataSourceError, MockDataSource, UpstreamDataSource, build_data_source,
};
pub use mock_data::{
    JOB_INDEX_SPACE, MockDataGenerator, PROJECT_LOOKUP_POOL, derive_build_status,
};
pub use query::{Predicate, filter, paginate};
pub use upstream::{UpstreamClient, UpstreamError};
