//! 顺序统计选择：Floyd–Rivest 选择算法与多路分组
//!
//! 批量加载在每一层都要把条目按坐标切成若干组，用选择代替完整排序，
//! 单次切分的期望复杂度为线性。
use std::cmp::Ordering;

/// 超过该长度的区间先用抽样估计缩小范围
const SAMPLE_THRESHOLD: usize = 600;

/// 在 `items[left..=right]` 内原地重排，使第 k 小的元素（按 `compare`）落在位置 k
///
/// 完成后 `left..k` 中的元素都不大于 `items[k]`，`k+1..=right` 中的元素都不小于它，
/// 两侧内部不保证有序。`k` 必须位于 `[left, right]` 内。
pub fn select<T, F>(items: &mut [T], left: usize, right: usize, k: usize, compare: &F)
where
    F: Fn(&T, &T) -> Ordering,
{
    let mut left = left;
    let mut right = right.min(items.len().saturating_sub(1));

    while right > left {
        if right - left > SAMPLE_THRESHOLD {
            // 根据样本大小和方差估计第 k 小元素所在的窄区间，先在窄区间内递归
            let n = (right - left + 1) as f64;
            let i = (k - left + 1) as f64;
            let z = n.ln();
            let s = 0.5 * (2.0 * z / 3.0).exp();
            let sign = if i - n / 2.0 < 0.0 { -1.0 } else { 1.0 };
            let sd = 0.5 * (z * s * (n - s) / n).sqrt() * sign;
            let k_f = k as f64;
            let new_left = (k_f - i * s / n + sd).floor().max(left as f64) as usize;
            let new_right = (k_f + (n - i) * s / n + sd).floor().min(right as f64) as usize;
            select(items, new_left, new_right, k, compare);
        }

        // Hoare 分区：枢轴放在区间的一端作为哨兵
        items.swap(left, k);
        let pivot = if compare(&items[right], &items[left]) == Ordering::Greater {
            left
        } else {
            items.swap(left, right);
            right
        };

        let mut i = left + 1;
        let mut j = right - 1;
        while compare(&items[i], &items[pivot]) == Ordering::Less {
            i += 1;
        }
        while compare(&items[j], &items[pivot]) == Ordering::Greater {
            j -= 1;
        }
        while i < j {
            items.swap(i, j);
            i += 1;
            j -= 1;
            while compare(&items[i], &items[pivot]) == Ordering::Less {
                i += 1;
            }
            while compare(&items[j], &items[pivot]) == Ordering::Greater {
                j -= 1;
            }
        }

        // 把枢轴放回它的最终位置 j
        if compare(&items[left], &items[pivot]) == Ordering::Equal {
            items.swap(left, j);
        } else {
            j += 1;
            items.swap(j, right);
        }

        match j.cmp(&k) {
            Ordering::Less => left = j + 1,
            Ordering::Greater => right = j - 1,
            Ordering::Equal => return,
        }
    }
}

/// 把 `items[left..=right]` 切成若干个大小为 `n` 的连续分组
///
/// 组内无序，组间有序：前一组的任意元素都不大于后一组的任意元素。
/// 分组从 `left` 开始每 `n` 个一组，最后一组可能不足 `n` 个。使用显式栈代替递归。
pub fn multi_select<T, F>(items: &mut [T], left: usize, right: usize, n: usize, compare: &F)
where
    F: Fn(&T, &T) -> Ordering,
{
    if items.is_empty() || n == 0 || left > right {
        return;
    }

    let end = right.min(items.len() - 1) + 1;
    let cuts: Vec<usize> = (n..end - left).step_by(n).collect();
    partition_at(&mut items[left..end], &cuts, compare);
}

/// 按给定的分界点把整个切片分成若干有序的连续分组
///
/// `cuts` 必须严格递增且位于 `(0, items.len())` 内；分界点归属右侧分组。
/// 每次在当前区间的中间分界点上调用 `select`，两侧区间入栈继续处理。
pub(crate) fn partition_at<T, F>(items: &mut [T], cuts: &[usize], compare: &F)
where
    F: Fn(&T, &T) -> Ordering,
{
    let mut stack = vec![(0, items.len(), cuts)];

    while let Some((start, end, cuts)) = stack.pop() {
        if cuts.is_empty() {
            continue;
        }

        let mid = cuts.len() / 2;
        let cut = cuts[mid];
        debug_assert!(start <= cut && cut < end, "cut {cut} outside {start}..{end}");
        select(items, start, end - 1, cut, compare);

        stack.push((start, cut, &cuts[..mid]));
        stack.push((cut, end, &cuts[mid + 1..]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn cmp_i64(a: &i64, b: &i64) -> Ordering {
        a.cmp(b)
    }

    fn assert_selected(items: &[i64], left: usize, right: usize, k: usize) {
        let pivot = items[k];
        assert!(items[left..k].iter().all(|&x| x <= pivot));
        assert!(items[k + 1..=right].iter().all(|&x| x >= pivot));
    }

    #[test]
    fn test_select_small() {
        let mut items = vec![65, 28, 59, 33, 21, 56, 22, 95, 50, 12, 90, 53, 28, 77, 39];
        let last = items.len() - 1;
        select(&mut items, 0, last, 8, &cmp_i64);

        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(items[8], sorted[8]);
        assert_eq!(items[8], 53);
        assert_selected(&items, 0, last, 8);
    }

    #[test]
    fn test_select_random_matches_sort() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let len = rng.gen_range(1..200);
            let original: Vec<i64> = (0..len).map(|_| rng.gen_range(-50..50)).collect();
            let k = rng.gen_range(0..len);

            let mut items = original.clone();
            select(&mut items, 0, len - 1, k, &cmp_i64);

            let mut sorted = original;
            sorted.sort();
            assert_eq!(items[k], sorted[k]);
            assert_selected(&items, 0, len - 1, k);
        }
    }

    #[test]
    fn test_select_large_range_uses_sampling() {
        let mut rng = StdRng::seed_from_u64(42);
        let len = 5000;
        let original: Vec<i64> = (0..len).map(|_| rng.gen_range(0..1_000_000)).collect();

        for k in [0, 1, 700, 2500, 4321, len - 1] {
            let mut items = original.clone();
            select(&mut items, 0, len - 1, k, &cmp_i64);

            let mut sorted = original.clone();
            sorted.sort();
            assert_eq!(items[k], sorted[k]);
            assert_selected(&items, 0, len - 1, k);
        }
    }

    #[test]
    fn test_select_all_equal() {
        let mut items = vec![3i64; 1500];
        select(&mut items, 0, 1499, 750, &cmp_i64);
        assert!(items.iter().all(|&x| x == 3));

        let mut items = vec![1i64, 1, 1, 1, 0, 1, 1];
        select(&mut items, 0, 6, 0, &cmp_i64);
        assert_eq!(items[0], 0);
    }

    #[test]
    fn test_select_subrange_only() {
        let mut items = vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0];
        select(&mut items, 2, 6, 4, &cmp_i64);

        // 区间外的元素保持不动
        assert_eq!(&items[..2], &[9, 8]);
        assert_eq!(&items[7..], &[2, 1, 0]);
        assert_eq!(items[4], 5);
        assert_selected(&items, 2, 6, 4);
    }

    #[test]
    fn test_multi_select_groups_are_ordered() {
        let mut rng = StdRng::seed_from_u64(3);

        for &(len, n) in &[(10usize, 3usize), (100, 7), (1000, 50), (2000, 333)] {
            let mut items: Vec<i64> = (0..len).map(|_| rng.gen_range(0..10_000)).collect();
            multi_select(&mut items, 0, len - 1, n, &cmp_i64);

            let groups: Vec<&[i64]> = items.chunks(n).collect();
            for pair in groups.windows(2) {
                let max_prev = pair[0].iter().max().copied().unwrap_or(i64::MIN);
                let min_next = pair[1].iter().min().copied().unwrap_or(i64::MAX);
                assert!(max_prev <= min_next, "len={len} n={n}");
            }
        }
    }

    #[test]
    fn test_multi_select_with_closure() {
        let mut points: Vec<(f64, f64)> = (0..60).map(|i| (((i * 17) % 60) as f64, i as f64)).collect();
        let by_x = |a: &(f64, f64), b: &(f64, f64)| a.0.total_cmp(&b.0);
        multi_select(&mut points, 0, 59, 10, &by_x);

        for (group, chunk) in points.chunks(10).enumerate() {
            let lo = (group * 10) as f64;
            assert!(chunk.iter().all(|p| p.0 >= lo && p.0 < lo + 10.0));
        }
    }

    #[test]
    fn test_partition_at_uneven_groups() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut items: Vec<i64> = (0..100).map(|_| rng.gen_range(0..1_000)).collect();
        let mut sorted = items.clone();
        sorted.sort();

        // 分组大小 13, 14, 13, 30, 30
        let cuts = [13, 27, 40, 70];
        partition_at(&mut items, &cuts, &cmp_i64);

        let mut start = 0;
        for end in cuts.iter().copied().chain([100]) {
            let mut group = items[start..end].to_vec();
            group.sort();
            assert_eq!(group.as_slice(), &sorted[start..end]);
            start = end;
        }
    }
}
