use nuru_macros::{nuru_route, nuru_route_alias, nuru_route_group, option, parameter};

#[nuru_route_group("users")]
pub struct UserGroup;

#[nuru_route("list", description = "List users", group = "UserGroup")]
#[nuru_route_alias("ls")]
pub struct ListUsers {
    #[option(long = "verbose", short = "v")]
    pub verbose: bool,
}

#[nuru_route("create {name}")]
pub struct CreateUser {
    #[parameter(description = "the user's display name")]
    pub name: String,
    #[option(long = "admin")]
    pub admin: bool,
}

fn main() {}
