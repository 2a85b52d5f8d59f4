// Virtual filesystem namespace: clients see `/`-rooted paths, the resolver
// pins them under the configured server root.
pub mod resolver;
