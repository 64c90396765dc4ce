pub mod get_info;

pub use get_info::GetInfoUseCase;
