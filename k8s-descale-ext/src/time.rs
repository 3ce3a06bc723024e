use k8s_openapi::jiff::SignedDuration;
use k8s_openapi::jiff::Timestamp;

use super::*;

pub trait TimeExt {
    fn now() -> Self;
    fn ago(age: SignedDuration) -> Self;
    fn age_at(&self, now: Timestamp) -> SignedDuration;
}

impl TimeExt for metav1::Time {
    /// Create a metav1::Time set to the current UTC time.
    ///
    /// # Examples
    ///
    /// ```
    /// use k8s_descale_ext::{TimeExt as _, metav1};
    /// let now = metav1::Time::now();
    /// ```
    fn now() -> Self {
        Self(Timestamp::now())
    }

    /// A timestamp `age` before the current UTC time.
    fn ago(age: SignedDuration) -> Self {
        Self(Timestamp::now() - age)
    }

    /// Elapsed time between this timestamp and `now`. Negative for timestamps in the future.
    fn age_at(&self, now: Timestamp) -> SignedDuration {
        now.duration_since(self.0)
    }
}
