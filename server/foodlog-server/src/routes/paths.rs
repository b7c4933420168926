//! Route path constants. Everything except health is mounted under [`API_PREFIX`].

pub const API_PREFIX: &str = "/api";

pub mod health {
    pub const HEALTH: &str = "/health";
}

pub mod users {
    pub const REGISTER: &str = "/users/register";
    pub const LOGIN: &str = "/users/login";
}

pub mod children {
    pub const CHILDREN: &str = "/children";
    pub const CHILD_BY_ID: &str = "/children/:id";
}

pub mod food_entries {
    pub const FOOD_ENTRIES: &str = "/food-entries";
    pub const BY_CHILD: &str = "/food-entries/child/:child_id";
    pub const ENTRY_BY_ID: &str = "/food-entries/:id";
}
