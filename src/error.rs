/// Macro to generate the `From<sqlx::Error>` conversion for a service error
///
/// Usage:
/// ```ignore
/// impl_service_error_conversions!(VerificationServiceError, Store);
/// ```
#[macro_export]
macro_rules! impl_service_error_conversions {
  ($error_type:ty, $store_variant:ident) => {
    impl From<sqlx::Error> for $error_type {
      fn from(err: sqlx::Error) -> Self {
        <$error_type>::$store_variant(format!("Database error: {}", err))
      }
    }
  };
}
