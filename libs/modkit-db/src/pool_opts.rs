//! Shared pool tuning for every sqlx backend.

use crate::ConnectOpts;

/// Applies [`ConnectOpts`] to an sqlx pool builder.
pub(crate) trait ApplyPoolOpts: Sized {
    fn apply(self, opts: &ConnectOpts) -> Self;
}

macro_rules! impl_apply_pool_opts {
    ($builder:ty) => {
        impl ApplyPoolOpts for $builder {
            fn apply(mut self, opts: &ConnectOpts) -> Self {
                if let Some(n) = opts.max_conns {
                    self = self.max_connections(n);
                }
                if let Some(n) = opts.min_conns {
                    self = self.min_connections(n);
                }
                if let Some(t) = opts.acquire_timeout {
                    self = self.acquire_timeout(t);
                }
                // `None` disables the timeout instead of keeping sqlx's default
                self = self.idle_timeout(opts.idle_timeout);
                self = self.max_lifetime(opts.max_lifetime);
                self.test_before_acquire(opts.test_before_acquire)
            }
        }
    };
}

impl_apply_pool_opts!(sqlx::postgres::PgPoolOptions);
impl_apply_pool_opts!(sqlx::sqlite::SqlitePoolOptions);
