use crate::models::candidate::Candidate;
use anyhow::{Context, Result};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从单个路径构建候选文件（读取元数据获取大小）
pub async fn load_candidate(path: &Path) -> Result<Candidate> {
    let metadata = fs::metadata(path)
        .await
        .with_context(|| format!("无法读取文件信息: {}", path.display()))?;

    if !metadata.is_file() {
        anyhow::bail!("不是普通文件: {}", path.display());
    }

    Ok(Candidate::from_path(path, Some(metadata.len())))
}

/// 按提交顺序构建候选文件列表
///
/// 读取失败的路径保留名称并记录原因，由校验环节拒绝并报告
pub async fn load_candidates(paths: &[PathBuf]) -> Vec<Candidate> {
    let loaded = join_all(paths.iter().map(|path| load_candidate(path))).await;

    paths
        .iter()
        .zip(loaded)
        .map(|(path, result)| match result {
            Ok(candidate) => candidate,
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
                Candidate::unreadable(path, format!("{:#}", e))
            }
        })
        .collect()
}

/// 列出文件夹中的所有文件（按文件名排序）
pub async fn list_folder(folder_path: &Path) -> Result<Vec<PathBuf>> {
    if !folder_path.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path.display());
    }

    let mut files = Vec::new();
    let mut entries = fs::read_dir(folder_path)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    tracing::info!("在 {} 中找到 {} 个文件", folder_path.display(), files.len());
    Ok(files)
}

/// 展开命令行参数：目录展开为其中的文件，文件保持原样
pub async fn expand_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            paths.extend(list_folder(input).await?);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::Payload;

    #[tokio::test]
    async fn test_load_candidates_keeps_order_and_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.pdf");
        let b = dir.path().join("b.png");
        std::fs::write(&a, vec![1u8; 32]).unwrap();
        std::fs::write(&b, vec![2u8; 8]).unwrap();
        let missing = dir.path().join("missing.xlsx");

        let candidates = load_candidates(&[b.clone(), missing, a.clone()]).await;

        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].name.as_deref(), Some("b.png"));
        assert_eq!(candidates[0].size, Some(8));
        assert!(matches!(candidates[0].payload, Some(Payload::File { .. })));
        assert_eq!(candidates[1].name.as_deref(), Some("missing.xlsx"));
        assert_eq!(candidates[1].size, None);
        assert!(candidates[1].payload.is_none());
        assert!(candidates[1].load_error.as_deref().is_some_and(|e| e.contains("missing.xlsx")));
        assert_eq!(candidates[2].size, Some(32));
    }

    #[tokio::test]
    async fn test_expand_paths_lists_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("2.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join("1.pdf"), b"y").unwrap();

        let paths = expand_paths(&[dir.path().to_path_buf()]).await.unwrap();

        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["1.pdf", "2.pdf"]);
    }
}
