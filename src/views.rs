use minijinja::{context, Environment};

const VERIFIED_TEMPLATE: &str = "verified.html";

/// Server-side HTML views. Templates are embedded at compile time.
pub struct ViewRenderer {
  env: Environment<'static>,
}

impl ViewRenderer {
  pub fn new() -> Result<Self, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(VERIFIED_TEMPLATE, include_str!("../templates/verified.html"))?;
    Ok(Self { env })
  }

  pub fn render_verified(&self, username: &str) -> Result<String, minijinja::Error> {
    self
      .env
      .get_template(VERIFIED_TEMPLATE)?
      .render(context! { username => username })
  }
}
