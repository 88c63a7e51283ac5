//! A context: a path prefix, the connectors it is reachable from, and the
//! handler chain that serves it.

use crate::handlers::HandlerChain;
use crate::routing::matcher::{PathPrefixMatcher, VirtualHosts};

#[derive(Debug)]
pub struct Context {
    path: PathPrefixMatcher,
    virtual_hosts: VirtualHosts,
    chain: HandlerChain,
}

impl Context {
    pub fn new(path_prefix: impl Into<String>, virtual_hosts: VirtualHosts, chain: HandlerChain) -> Self {
        Self {
            path: PathPrefixMatcher::new(path_prefix),
            virtual_hosts,
            chain,
        }
    }

    pub fn path_prefix(&self) -> &str {
        self.path.prefix()
    }

    pub fn virtual_hosts(&self) -> &VirtualHosts {
        &self.virtual_hosts
    }

    pub fn chain(&self) -> &HandlerChain {
        &self.chain
    }

    pub fn matches_path(&self, path: &str) -> bool {
        self.path.matches(path)
    }
}
