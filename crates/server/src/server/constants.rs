/// Hard upper bound for any request body, sized for the largest video
/// uploads the platform accepts.
pub const MAX_UPLOAD_BYTES: usize = 128 * 1024 * 1024;
