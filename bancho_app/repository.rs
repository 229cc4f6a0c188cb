mod map_request_repository;

pub use map_request_repository::MapRequestRepository;
