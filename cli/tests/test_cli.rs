//! Integration tests for the nnews CLI.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::Parser;
    use nnews_cli::{
        cli::{ArticleCommands, ArticleFields, Cli, Commands, TagCommands},
        commands::{articles::fill_editor, resolve_config},
    };
    use nnews_client::{ArticleEditor, NewsConfig};
    use nnews_shared::{Article, ArticleStatus, Role};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("nnews").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn article_list_collects_repeated_roles() {
        let cli = parse(&["articles", "list", "--role", "admin", "--role", "staff", "--page", "2"]);
        let Commands::Articles {
            command: ArticleCommands::List {
                roles,
                page,
                page_size,
                category_id,
            },
        } = cli.command
        else {
            panic!("expected articles list");
        };
        assert_eq!(roles, vec!["admin".to_string(), "staff".to_string()]);
        assert_eq!(page, Some(2));
        assert_eq!(page_size, None);
        assert_eq!(category_id, None);
    }

    #[test]
    fn article_create_parses_status_labels() {
        let cli = parse(&[
            "articles",
            "create",
            "--title",
            "Hello",
            "--content",
            "Body",
            "--status",
            "published",
            "--tags",
            "rust, wasm",
        ]);
        let Commands::Articles {
            command: ArticleCommands::Create(fields),
        } = cli.command
        else {
            panic!("expected articles create");
        };
        assert_eq!(fields.status, Some(ArticleStatus::Published));
        assert_eq!(fields.tags.as_deref(), Some("rust, wasm"));
        assert!(fields.roles.is_empty());
    }

    fn update_fields(extra: &[&str]) -> ArticleFields {
        let mut args = vec!["articles", "update", "5", "--title", "Launch", "--content", "Body"];
        args.extend_from_slice(extra);
        let Commands::Articles {
            command: ArticleCommands::Update {
                fields,
                ..
            },
        } = parse(&args).command
        else {
            panic!("expected articles update");
        };
        fields
    }

    fn staff_only_editor() -> ArticleEditor {
        ArticleEditor::from_article(&Article {
            article_id: 5,
            category_id: Some(2),
            author_id: None,
            title: "Launch".to_string(),
            content: "Body".to_string(),
            image_name: None,
            image_url: None,
            status: ArticleStatus::Published,
            date_at: None,
            created_at: None,
            updated_at: None,
            category: None,
            tags: Vec::new(),
            roles: vec![Role {
                slug: "staff".to_string(),
                name: "Staff".to_string(),
            }],
        })
    }

    #[test]
    fn update_without_visibility_flags_keeps_roles() {
        let mut editor = staff_only_editor();
        fill_editor(&mut editor, update_fields(&[])).expect("fill");
        assert!(!editor.visible_to_all());
        assert_eq!(editor.selected_roles(), vec!["staff".to_string()]);
        assert_eq!(editor.status, ArticleStatus::Published);
    }

    #[test]
    fn update_roles_replace_existing_ones() {
        let mut editor = staff_only_editor();
        fill_editor(&mut editor, update_fields(&["--role", "admin", "--role", "admin"]))
            .expect("fill");
        assert!(!editor.visible_to_all());
        assert_eq!(editor.selected_roles(), vec!["admin".to_string()]);
    }

    #[test]
    fn public_flag_makes_article_visible_to_all() {
        let mut editor = staff_only_editor();
        fill_editor(&mut editor, update_fields(&["--public"])).expect("fill");
        assert!(editor.visible_to_all());
        assert!(editor.selected_roles().is_empty());
    }

    #[test]
    fn public_and_role_conflict() {
        let result = Cli::try_parse_from([
            "nnews", "articles", "update", "5", "--title", "a", "--content", "b", "--public",
            "--role", "staff",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_status_is_a_parse_error() {
        let result = Cli::try_parse_from([
            "nnews", "articles", "create", "--title", "a", "--content", "b", "--status", "gone",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn tag_merge_takes_two_ids() {
        let cli = parse(&["tags", "merge", "3", "7"]);
        assert!(matches!(
            cli.command,
            Commands::Tags {
                command: TagCommands::Merge {
                    source: 3,
                    target: 7,
                },
            }
        ));
    }

    #[test]
    fn flags_override_environment_config() {
        let cli = parse(&[
            "--api-url",
            "https://news.example.com",
            "--token",
            "abc",
            "--timeout-secs",
            "1",
            "tags",
            "list",
        ]);
        let base = NewsConfig::new("http://localhost:5000").with_bearer_token("from-env");

        let config = resolve_config(&cli, base);

        assert_eq!(config.endpoint_base(), "https://news.example.com/api");
        assert_eq!(
            config.headers,
            vec![("Authorization".to_string(), "Bearer abc".to_string())]
        );
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = parse(&["categories", "list", "--base-path", "/v2"]);
        let config = resolve_config(&cli, NewsConfig::default());
        assert_eq!(config.endpoint_base(), "http://localhost:5000/v2");
    }
}
