use regex::Regex;
use std::path::Path;

pub fn simplify_file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The name of the folder that directly contains the file. Empty if there is none.
fn parent_dir_name(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The group of a source workbook, derived from its name.
///
/// In order:
/// * `<group>_resultados.xlsx`
/// * `... resultado <group>.xlsx`
/// * the name of the containing folder
///
/// The result is not trimmed.
pub fn infer_group(path: &Path) -> String {
    let name = simplify_file_name(path);

    let suffix = Regex::new(r"(?i)^(.*)_resultados\.xlsx$").expect("regex is valid");
    if let Some(caps) = suffix.captures(&name) {
        return caps[1].to_string();
    }

    let prefix = Regex::new(r"(?i)resultado\s+(.+)\.xlsx$").expect("regex is valid");
    if let Some(caps) = prefix.captures(&name) {
        return caps[1].to_string();
    }

    parent_dir_name(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_from_suffix() {
        assert_eq!(infer_group(Path::new("x/NorteCoop_resultados.xlsx")), "NorteCoop");
        assert_eq!(infer_group(Path::new("x/Coop Vale_RESULTADOS.XLSX")), "Coop Vale");
    }

    #[test]
    fn group_after_resultado() {
        assert_eq!(infer_group(Path::new("x/resultado Sul Leite.xlsx")), "Sul Leite");
        assert_eq!(
            infer_group(Path::new("x/Resultado   Oeste .xlsx")),
            "Oeste "
        );
    }

    #[test]
    fn group_from_folder() {
        assert_eq!(infer_group(Path::new("root/CoopCentral/misc.xlsx")), "CoopCentral");
        assert_eq!(
            infer_group(Path::new("root/CoopCentral/resultados_2023.xlsx")),
            "CoopCentral"
        );
        assert_eq!(infer_group(Path::new("misc.xlsx")), "");
    }

    #[test]
    fn file_name() {
        assert_eq!(
            simplify_file_name(Path::new("a/b/NorteCoop_resultados.xlsx")),
            "NorteCoop_resultados.xlsx"
        );
    }
}
