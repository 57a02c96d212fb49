use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Release of an address outside both pools of a network.
    #[error("Can't release IP `{ip}' back to `{network}' network: it's neither in dynamic nor in static pool")]
    IpNotOwned { ip: String, network: String },

    #[error("Range bounds {first} and {last} belong to different address families")]
    MixedFamilies { first: String, last: String },
}
