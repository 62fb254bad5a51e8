//! # 材料组成解析器
//!
//! 解析命令行的材料描述：
//! - 逗号分隔的 `符号:质量分数` 列表，如 `"Fe:0.7,Ni:0.3"`
//! - 单个元素符号，如 `"Cu"`（质量分数取 1，密度取标准值）
//! - 预定义材料名，如 `"air"`, `"water"`
//! - 路径层段 `材料@厚度cm[@密度]`，如 `"Al@0.0125"`
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `atomic/` 解析元素符号
//! - 使用 `regex` 匹配组成项

use std::sync::LazyLock;

use regex::Regex;

use crate::atomic;
use crate::error::{Result, XrfSimError};
use crate::models::{MaterialComposition, PathSegment};

/// 组成项 `符号:分数` 的匹配模式
static COMPONENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]{1,2}):([0-9]*\.?[0-9]+(?:[eE][+-]?[0-9]+)?)$").unwrap());

/// 预定义材料：名称 → (组成, 密度 g/cm³)
///
/// 空气组成为海平面干空气的质量分数。
fn named_material(name: &str) -> Option<(&'static [(u32, f64)], f64)> {
    match name.to_lowercase().as_str() {
        "air" => Some((&[(7, 0.755), (8, 0.232), (18, 0.013)], 1.205e-3)),
        "water" => Some((&[(1, 0.1119), (8, 0.8881)], 1.0)),
        "mylar" => Some((&[(1, 0.042), (6, 0.625), (8, 0.333)], 1.40)),
        "kapton" => Some((&[(1, 0.026), (6, 0.691), (7, 0.073), (8, 0.209)], 1.42)),
        _ => None,
    }
}

/// 解析组成字符串为 (原子序数, 质量分数) 列表
pub fn parse_composition(input: &str) -> Result<Vec<(u32, f64)>> {
    let tokens: Vec<&str> = input
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if tokens.is_empty() {
        return Err(XrfSimError::ParseError {
            format: "composition".to_string(),
            input: input.to_string(),
            reason: "empty composition".to_string(),
        });
    }

    // 单个裸符号视作纯元素
    if tokens.len() == 1 && !tokens[0].contains(':') {
        let z = resolve_symbol(tokens[0])?;
        return Ok(vec![(z, 1.0)]);
    }

    let mut components = Vec::with_capacity(tokens.len());
    for token in tokens {
        let caps = COMPONENT_RE.captures(token).ok_or_else(|| XrfSimError::ParseError {
            format: "composition".to_string(),
            input: input.to_string(),
            reason: format!("expected 'Symbol:fraction', got '{}'", token),
        })?;
        let z = resolve_symbol(&caps[1])?;
        let fraction: f64 = caps[2].parse().map_err(|_| XrfSimError::ParseError {
            format: "composition".to_string(),
            input: input.to_string(),
            reason: format!("invalid fraction in '{}'", token),
        })?;
        components.push((z, fraction));
    }
    Ok(components)
}

/// 解析材料描述为 MaterialComposition
///
/// 预定义材料名和纯元素可省略密度，其余组成必须显式给出密度。
pub fn parse_material(spec: &str, density: Option<f64>) -> Result<MaterialComposition> {
    if let Some((components, default_density)) = named_material(spec.trim()) {
        return MaterialComposition::new(components, density.unwrap_or(default_density));
    }

    let components = parse_composition(spec)?;
    let density = match density {
        Some(d) => d,
        None if components.len() == 1 => atomic::density(components[0].0),
        None => {
            return Err(XrfSimError::InvalidComposition(format!(
                "density required for multi-element composition '{}'",
                spec
            )))
        }
    };
    MaterialComposition::new(&components, density)
}

/// 解析路径层段描述 `材料@厚度cm[@密度]`
pub fn parse_path_segment(spec: &str) -> Result<PathSegment> {
    let parts: Vec<&str> = spec.split('@').map(|s| s.trim()).collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(XrfSimError::ParseError {
            format: "path segment".to_string(),
            input: spec.to_string(),
            reason: "expected 'material@thickness_cm' or 'material@thickness_cm@density'"
                .to_string(),
        });
    }
    let thickness_cm: f64 = parts[1].parse().map_err(|_| XrfSimError::ParseError {
        format: "path segment".to_string(),
        input: spec.to_string(),
        reason: format!("invalid thickness '{}'", parts[1]),
    })?;
    let density = if parts.len() == 3 {
        Some(parts[2].parse().map_err(|_| XrfSimError::ParseError {
            format: "path segment".to_string(),
            input: spec.to_string(),
            reason: format!("invalid density '{}'", parts[2]),
        })?)
    } else {
        None
    };
    let material = parse_material(parts[0], density)?;
    PathSegment::new(material, thickness_cm)
}

/// 元素符号解析为原子序数
fn resolve_symbol(symbol: &str) -> Result<u32> {
    atomic::element_by_symbol(symbol)
        .map(|rec| rec.z)
        .ok_or_else(|| XrfSimError::UnknownElement(symbol.to_string()))
}

/// 解析元素标识：符号或原子序数字符串
pub fn parse_element(input: &str) -> Result<u32> {
    let input = input.trim();
    if let Ok(z) = input.parse::<u32>() {
        return match atomic::element(z) {
            Some(_) => Ok(z),
            None => Err(XrfSimError::UnknownElement(format!("Z = {}", z))),
        };
    }
    resolve_symbol(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_component_alloy() {
        let comps = parse_composition("Fe:0.7,Ni:0.3").unwrap();
        assert_eq!(comps, vec![(26, 0.7), (28, 0.3)]);
    }

    #[test]
    fn test_parse_bare_symbol() {
        let comps = parse_composition("Cu").unwrap();
        assert_eq!(comps, vec![(29, 1.0)]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_composition("").is_err());
        assert!(parse_composition("Fe:").is_err());
        assert!(parse_composition("Fe:abc").is_err());
        assert!(parse_composition("Xq:0.5,Ni:0.5").is_err());
    }

    #[test]
    fn test_pure_element_uses_standard_density() {
        let mat = parse_material("Fe", None).unwrap();
        assert!((mat.density() - 7.874).abs() < 1e-6);
    }

    #[test]
    fn test_multi_element_requires_density() {
        assert!(parse_material("Fe:0.7,Ni:0.3", None).is_err());
        let mat = parse_material("Fe:0.7,Ni:0.3", Some(8.1)).unwrap();
        assert_eq!(mat.n_elements(), 2);
    }

    #[test]
    fn test_named_material_air() {
        let air = parse_material("air", None).unwrap();
        assert_eq!(air.n_elements(), 3);
        assert!((air.density() - 1.205e-3).abs() < 1e-9);
    }

    #[test]
    fn test_parse_element_symbol_or_z() {
        assert_eq!(parse_element("W").unwrap(), 74);
        assert_eq!(parse_element("74").unwrap(), 74);
        assert!(parse_element("0").is_err());
        assert!(parse_element("Qq").is_err());
    }

    #[test]
    fn test_parse_path_segment() {
        let seg = parse_path_segment("Al@0.0125").unwrap();
        assert_eq!(seg.material.components(), &[(13, 1.0)]);
        assert!((seg.thickness_cm - 0.0125).abs() < 1e-12);

        let seg = parse_path_segment("Fe:0.5,Cr:0.5@0.1@7.8").unwrap();
        assert_eq!(seg.material.n_elements(), 2);
        assert!((seg.material.density() - 7.8).abs() < 1e-12);

        assert!(parse_path_segment("Al").is_err());
        assert!(parse_path_segment("Al@x").is_err());
    }
}
