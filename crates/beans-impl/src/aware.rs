//! 感知回调分发
//!
//! 属性填充完成后、实例发布前，按固定顺序调用类描述符上
//! 声明的感知槽位：名称感知先于容器感知。

use beans_abstractions::{BeanClass, ContainerHandle};
use std::any::Any;
use tracing::trace;

/// 分发感知回调
pub fn dispatch(
    class: &BeanClass,
    bean_name: &str,
    instance: &mut (dyn Any + Send + Sync),
    handle: ContainerHandle,
) {
    if let Some(callback) = &class.aware.bean_name {
        trace!("分发名称感知回调: {}", bean_name);
        callback(&mut *instance, bean_name);
    }
    if let Some(callback) = &class.aware.container {
        trace!("分发容器感知回调: {}", bean_name);
        callback(&mut *instance, handle);
    }
}
