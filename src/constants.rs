pub const RECIPE_COUNT_PER_PAGE: i64 = 6;
pub const INGREDIENT_COUNT_PER_PAGE: i64 = 50;
pub const FOLLOW_COUNT_PER_PAGE: i64 = 10;

pub const SESSION_COOKIE: &str = "session";
pub const JWT_SECRET_ENV: &str = "FOODGRAM_JWT_SECRET";
pub const MEDIA_ROOT_ENV: &str = "FOODGRAM_MEDIA_ROOT";

pub const SHOPPING_LIST_HEADER: &str = "Ваш список покупок:\n\n";
pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";
pub const SHOPPING_LIST_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

pub const USER_ROLES: &[(&str, &str)] = &[("user", "User"), ("admin", "Administrator")];

pub const MEASUREMENT_UNITS: &[&str] = &["г", "кг", "мл", "л", "шт.", "ст. л.", "ч. л.", "по вкусу"];
