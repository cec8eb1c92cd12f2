    use super::*;
    use crate::value::ModelValue;
    use crate::Error;

    fn person_type() -> TypeMetadata {
        TypeMetadata::new("Person")
            .property(PropertyMetadata::new("Name", ModelType::string()))
            .property(PropertyMetadata::new("Age", ModelType::int()))
            .property(PropertyMetadata::new("Home", ModelType::complex("Address")))
    }

    fn address_type() -> TypeMetadata {
        TypeMetadata::new("Address")
            .property(PropertyMetadata::new("Street", ModelType::string()))
            .property(PropertyMetadata::new("Zip", ModelType::nullable(ScalarKind::UInt)))
    }

    // ========================================
    // Scalar conversion
    // ========================================

    #[test]
    fn test_convert_string_is_verbatim() {
        assert_eq!(
            ScalarKind::String.convert(" Billy ").unwrap(),
            ModelValue::String(" Billy ".to_string())
        );
    }

    #[test]
    fn test_convert_numbers_trim_whitespace() {
        assert_eq!(ScalarKind::Int.convert(" -12 ").unwrap(), ModelValue::Int(-12));
        assert_eq!(ScalarKind::UInt.convert("12").unwrap(), ModelValue::UInt(12));
        assert_eq!(ScalarKind::Float.convert("1.5").unwrap(), ModelValue::Float(1.5));
    }

    #[test]
    fn test_convert_rejects_bad_input() {
        assert!(ScalarKind::Int.convert("abc").is_err());
        assert!(ScalarKind::UInt.convert("-1").is_err());
        assert!(ScalarKind::Bool.convert("yes").is_err());
        assert!(ScalarKind::Uuid.convert("not-a-uuid").is_err());
        assert!(ScalarKind::DateTime.convert("yesterday").is_err());
    }

    #[test]
    fn test_convert_bool_case_insensitive() {
        assert_eq!(ScalarKind::Bool.convert("TRUE").unwrap(), ModelValue::Bool(true));
        assert_eq!(ScalarKind::Bool.convert("false").unwrap(), ModelValue::Bool(false));
    }

    #[test]
    fn test_convert_uuid_and_datetime() {
        let id = ScalarKind::Uuid
            .convert("67e55044-10b1-426f-9247-bb680e5fe0c8")
            .unwrap();
        assert!(matches!(id, ModelValue::Uuid(_)));

        let at = ScalarKind::DateTime.convert("2024-05-01T10:00:00+02:00").unwrap();
        assert!(matches!(at, ModelValue::DateTime(_)));
    }

    // ========================================
    // Model types
    // ========================================

    #[test]
    fn test_shape_classifier() {
        assert_eq!(ModelType::string().shape(), ModelShape::Simple);
        assert_eq!(ModelType::complex("Person").shape(), ModelShape::Complex);
        assert_eq!(
            ModelType::collection(ModelType::int()).shape(),
            ModelShape::Collection
        );
        assert_eq!(
            ModelType::dictionary(ModelType::string()).shape(),
            ModelShape::Dictionary
        );
    }

    #[test]
    fn test_referenced_types_walks_containers() {
        let t = ModelType::dictionary(ModelType::collection(ModelType::complex("Address")));
        assert_eq!(t.referenced_types(), vec!["Address"]);
        assert!(ModelType::int().referenced_types().is_empty());
    }

    #[test]
    fn test_property_field_name_prefers_binder_model_name() {
        let plain = PropertyMetadata::new("Name", ModelType::string());
        assert_eq!(plain.field_name(), "Name");

        let renamed = PropertyMetadata::new("Name", ModelType::string())
            .with_binder_model_name("display_name");
        assert_eq!(renamed.field_name(), "display_name");
        assert_eq!(renamed.name(), "Name");
    }

    #[test]
    fn test_bindable_properties_skip_never() {
        let t = TypeMetadata::new("Account")
            .property(PropertyMetadata::new("Login", ModelType::string()))
            .property(PropertyMetadata::new("IsAdmin", ModelType::bool()).never_bind());

        let names: Vec<&str> = t.bindable_properties().map(|p| p.name()).collect();
        assert_eq!(names, vec!["Login"]);
    }

    // ========================================
    // Registry
    // ========================================

    #[test]
    fn test_registry_build_valid() {
        let registry = MetadataRegistryBuilder::new()
            .add_type(person_type())
            .add_type(address_type())
            .build()
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.type_names(), vec!["Address", "Person"]);
        assert_eq!(registry.resolve("Person").unwrap().properties().len(), 3);
    }

    #[test]
    fn test_registry_rejects_unknown_reference() {
        // Person refers to Address, which is missing
        let err = MetadataRegistryBuilder::new()
            .add_type(person_type())
            .build()
            .unwrap_err();

        match err {
            Error::Configuration(msg) => assert!(msg.contains("Person.Home"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_registry_rejects_duplicate_property() {
        let t = TypeMetadata::new("Dup")
            .property(PropertyMetadata::new("Name", ModelType::string()))
            .property(PropertyMetadata::new("name", ModelType::string()));

        let err = MetadataRegistryBuilder::new().add_type(t).build().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_registry_rejects_duplicate_type() {
        let err = MetadataRegistryBuilder::new()
            .add_type(address_type())
            .add_type(address_type())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_registry_allows_self_reference() {
        let node = TypeMetadata::new("Node")
            .property(PropertyMetadata::new("Value", ModelType::int()))
            .property(PropertyMetadata::new("Next", ModelType::complex("Node")));

        assert!(MetadataRegistryBuilder::new().add_type(node).build().is_ok());
    }

    #[test]
    fn test_resolve_unknown_type() {
        let registry = MetadataRegistry::default();
        assert!(matches!(
            registry.resolve("Missing"),
            Err(Error::UnknownType(name)) if name == "Missing"
        ));
    }

    #[test]
    fn test_validate_parameter() {
        let registry = MetadataRegistryBuilder::new()
            .add_type(address_type())
            .build()
            .unwrap();

        let ok = ParameterDescriptor::new("address", ModelType::complex("Address"));
        assert!(registry.validate_parameter(&ok).is_ok());

        let unknown = ParameterDescriptor::new("person", ModelType::complex("Person"));
        assert!(registry.validate_parameter(&unknown).is_err());

        let unnamed = ParameterDescriptor::new(" ", ModelType::string());
        assert!(registry.validate_parameter(&unnamed).is_err());
    }

    struct Tag;

    impl Bindable for Tag {
        fn type_metadata() -> TypeMetadata {
            TypeMetadata::new("Tag").property(PropertyMetadata::new("Label", ModelType::string()))
        }
    }

    #[test]
    fn test_register_bindable() {
        let registry = MetadataRegistryBuilder::new().register::<Tag>().build().unwrap();
        assert!(registry.get("Tag").is_some());
    }
