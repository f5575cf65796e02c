pub use anyhow::{anyhow, bail, ensure, Context};
