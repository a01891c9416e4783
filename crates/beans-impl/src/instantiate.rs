//! 参数匹配与重载选择
//!
//! 把定义中声明的构造参数安排到候选签名的参数槽位上：
//! 显式索引条目先占位，未索引条目按类型提示再按声明顺序
//! 填入剩余槽位，没有声明值的槽位交给自动装配。所有声明
//! 值都能安放的签名才算匹配。

use beans_common::{BeansError, BeansResult, ConstructorArgumentValues, ValueHolder};
use beans_abstractions::{ConstructorDescriptor, FactoryMethodDescriptor, ParameterDescriptor};

/// 单个参数槽位的来源
#[derive(Debug, Clone)]
pub enum ParamBinding {
    /// 定义中显式声明的值
    Declared(ValueHolder),
    /// 交给按类型自动装配
    Autowire {
        /// 参数声明类型名
        type_name: String,
        /// 是否必需
        required: bool,
    },
}

/// 把声明的参数值安排到签名的槽位上
///
/// 任何声明值无法安放时返回 `None`，该签名不参与选择。
pub fn plan_arguments(
    parameters: &[ParameterDescriptor],
    values: &ConstructorArgumentValues,
) -> Option<Vec<ParamBinding>> {
    if values.len() > parameters.len() {
        return None;
    }
    let mut slots: Vec<Option<ValueHolder>> = parameters.iter().map(|_| None).collect();

    // 显式索引条目先占位
    for (index, holder) in values.indexed() {
        if *index >= parameters.len() {
            return None;
        }
        if let Some(hint) = &holder.type_hint {
            if parameters[*index].type_name != *hint {
                return None;
            }
        }
        slots[*index] = Some(holder.clone());
    }

    // 未索引条目：有类型提示的按提示找空槽，否则按声明顺序
    for holder in values.generic() {
        let slot = match &holder.type_hint {
            Some(hint) => slots
                .iter()
                .zip(parameters)
                .position(|(slot, param)| slot.is_none() && param.type_name == *hint),
            None => slots.iter().position(|slot| slot.is_none()),
        };
        match slot {
            Some(index) => slots[index] = Some(holder.clone()),
            None => return None,
        }
    }

    Some(
        slots
            .into_iter()
            .zip(parameters)
            .map(|(slot, param)| match slot {
                Some(holder) => ParamBinding::Declared(holder),
                None => ParamBinding::Autowire {
                    type_name: param.type_name.clone(),
                    required: param.required,
                },
            })
            .collect(),
    )
}

/// 从候选构造函数中选择唯一匹配
///
/// 能安放全部声明值的签名里取参数最少的，减少自动装配面；
/// 同元数多个匹配视为定义歧义。
pub fn select_constructor<'c>(
    bean_name: &str,
    constructors: &'c [ConstructorDescriptor],
    values: &ConstructorArgumentValues,
) -> BeansResult<(&'c ConstructorDescriptor, Vec<ParamBinding>)> {
    let mut matches: Vec<(&ConstructorDescriptor, Vec<ParamBinding>)> = constructors
        .iter()
        .filter_map(|ctor| plan_arguments(&ctor.parameters, values).map(|plan| (ctor, plan)))
        .collect();
    if matches.is_empty() {
        return Err(BeansError::invalid_definition(
            bean_name,
            "没有与声明的构造参数兼容的构造函数",
        ));
    }
    let min_arity = matches
        .iter()
        .map(|(ctor, _)| ctor.parameters.len())
        .min()
        .unwrap_or(0);
    matches.retain(|(ctor, _)| ctor.parameters.len() == min_arity);
    if matches.len() > 1 {
        return Err(BeansError::invalid_definition(
            bean_name,
            format!("构造函数歧义: {} 个 {} 元签名均可匹配", matches.len(), min_arity),
        ));
    }
    Ok(matches.remove(0))
}

/// 从同名工厂方法候选中选择唯一匹配
pub fn select_factory_method<'c>(
    bean_name: &str,
    method_name: &str,
    candidates: Vec<&'c FactoryMethodDescriptor>,
    values: &ConstructorArgumentValues,
) -> BeansResult<(&'c FactoryMethodDescriptor, Vec<ParamBinding>)> {
    let mut matches: Vec<(&FactoryMethodDescriptor, Vec<ParamBinding>)> = candidates
        .into_iter()
        .filter_map(|method| {
            plan_arguments(&method.parameters, values).map(|plan| (method, plan))
        })
        .collect();
    if matches.is_empty() {
        return Err(BeansError::NoMatchingFactoryMethod {
            name: bean_name.to_string(),
            method: method_name.to_string(),
        });
    }
    let min_arity = matches
        .iter()
        .map(|(method, _)| method.parameters.len())
        .min()
        .unwrap_or(0);
    matches.retain(|(method, _)| method.parameters.len() == min_arity);
    if matches.len() > 1 {
        return Err(BeansError::AmbiguousFactoryMethod {
            name: bean_name.to_string(),
            method: method_name.to_string(),
            matches: matches.len(),
        });
    }
    Ok(matches.remove(0))
}
