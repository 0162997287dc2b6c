pub mod mock_geocoder;

#[allow(unused_imports)]
pub use mock_geocoder::MockGeocoder;
