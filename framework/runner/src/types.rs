/// Recommended error type for a scenario's `main` function and any shared
/// scenario code. This type is compatible with the framework's hook results
/// so you can use `?` to propagate errors.
pub type HarnessResult<T> = anyhow::Result<T>;
