//! Client side of the service: a typed caller for the `/api` routes, the
//! session storage capability and login form state.

mod api;
mod login;
mod storage;

pub use api::{ApiClient, ClientError};
pub use login::{ApiAuthenticator, AuthFailure, Authenticator, LoginForm, POST_LOGIN_ROUTE};
pub use storage::{AuthData, AuthStorage, MemoryStorage, REFRESH_TOKEN_KEY, TOKEN_KEY, USER_KEY};
