//! 解析上下文
//!
//! 每次外部 get_bean 请求持有一条独立的解析链，用于
//! 循环依赖检测和递归深度限制。链与请求同生命周期，
//! 不跨请求共享。

use beans_common::{BeansError, BeansResult};

/// 单次解析请求的状态
#[derive(Debug)]
pub struct ResolveContext {
    chain: Vec<String>,
    max_depth: usize,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new(max_depth: usize) -> Self {
        Self {
            chain: Vec::new(),
            max_depth,
        }
    }

    /// 将名称压入解析链
    ///
    /// 名称已在链上说明出现了循环引用；链长超过上限说明
    /// 配置产生了过深的递归。
    pub fn push(&mut self, name: &str) -> BeansResult<()> {
        if let Some(pos) = self.chain.iter().position(|n| n == name) {
            let mut cycle: Vec<String> = self.chain[pos..].to_vec();
            cycle.push(name.to_string());
            return Err(BeansError::CircularDependency { cycle });
        }
        if self.chain.len() >= self.max_depth {
            return Err(BeansError::ResolutionDepthExceeded {
                name: name.to_string(),
                depth: self.max_depth,
            });
        }
        self.chain.push(name.to_string());
        Ok(())
    }

    /// 弹出链顶名称
    pub fn pop(&mut self) {
        self.chain.pop();
    }

    /// 当前解析链
    pub fn chain(&self) -> &[String] {
        &self.chain
    }
}
