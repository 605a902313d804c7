//! Endpoint-specific API implementations
//!
//! | Module | Backend route | Description |
//! |--------|---------------|-------------|
//! | `products` | `GET /products` | Menu items |
//! | `categories` | `GET /categories` | Menu categories |
//! | `auth` | `POST /auth/refresh` | Credential refresh |

pub mod auth;
pub mod categories;
pub mod products;

pub use auth::AuthApi;
pub use categories::CategoriesApi;
pub use products::ProductsApi;
