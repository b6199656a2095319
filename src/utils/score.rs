//! 分数与百分比的数值工具

/// 成绩统一使用的满分刻度
pub const SCORE_SCALE: f64 = 10.0;

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 百分比，限定在 [0, 100]
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        return 0.0;
    }
    round2((part / whole * 100.0).clamp(0.0, 100.0))
}

/// 将 [0, max_points] 的原始分换算到 0–10 刻度
///
/// 满分未配置时认为原始分已是 0–10 刻度。
pub fn normalize(score: f64, max_points: f64) -> f64 {
    if max_points <= 0.0 {
        return score.clamp(0.0, SCORE_SCALE);
    }
    (score / max_points * SCORE_SCALE).clamp(0.0, SCORE_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_bounds() {
        assert_eq!(percentage(8.0, 10.0), 80.0);
        assert_eq!(percentage(3.0, 0.0), 0.0);
        assert_eq!(percentage(12.0, 10.0), 100.0);
        assert_eq!(percentage(1.0, 3.0), 33.33);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(45.0, 50.0), 9.0);
        assert_eq!(normalize(7.5, 0.0), 7.5);
        assert_eq!(normalize(120.0, 100.0), 10.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(9.0 * 0.4 + 8.5 * 0.6), 8.7);
        assert_eq!(round2(6.666_666), 6.67);
    }
}
