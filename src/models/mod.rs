pub mod category;
pub mod prompt;
pub mod rating;
pub mod settings;
pub mod tag;
pub mod user;

pub use category::{Category, CategoryCreate};
pub use prompt::{Prompt, PromptCreate, PromptUpdate, PromptView};
pub use rating::{Rating, RatingCreate};
pub use settings::{Settings, SettingsUpdate, SETTINGS_ID};
pub use tag::{Tag, TagCreate};
pub use user::{Role, TokenResponse, User, UserCreate, UserLogin};
