use nuru_macros::{nuru_route, option};

#[nuru_route("deploy")]
pub struct Deploy {
    #[option(short = "f")]
    pub force: bool,
}

fn main() {}
