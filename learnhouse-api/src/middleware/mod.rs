/// Middleware for the API server
///
/// - `install_mode`: rejects install routes once provisioning is done

pub mod install_mode;
