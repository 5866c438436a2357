#[cfg(test)]
mod test {
    use a2ljson::*;
    use tempfile::tempdir;

    const ENGINE_A2L: &str = include_str!("data/engine.a2l");

    fn load_engine() -> A2lFile {
        let (a2l_file, diagnostics) = load_from_string(ENGINE_A2L).unwrap();
        assert!(diagnostics.is_empty(), "{diagnostics:#?}");
        a2l_file
    }

    #[test]
    fn load_engine_file() {
        let a2l_file = load_engine();
        assert_eq!(
            a2l_file.asap2_version,
            Some(Asap2Version {
                version_no: 1,
                upgrade_no: 71
            })
        );
        assert_eq!(a2l_file.project.long_identifier, "Engine control \"ECU 2\"");
        let header = a2l_file.project.header.as_ref().unwrap();
        assert_eq!(header.project_no.as_deref(), Some("P4711"));

        let module = &a2l_file.project.module[0];
        assert_eq!(module.name, "ecu");
        assert!(module.a2ml.as_ref().unwrap().text.contains("taggedunion if_data"));
        assert_eq!(module.measurement.len(), 3);
        assert_eq!(module.characteristic.len(), 2);
        assert_eq!(module.compu_method.len(), 5);
        assert_eq!(module.record_layout.len(), 3);
        assert_eq!(module.unit.len(), 2);
        assert!(module.unknown.is_empty());

        let mod_par = module.mod_par.as_ref().unwrap();
        assert_eq!(mod_par.addr_epk, vec![0x8000_1000]);
        assert_eq!(mod_par.ecu_calibration_offset, Some(-16));
        let segment = mod_par.memory_segment.get("data").unwrap();
        assert_eq!(segment.address, 0x8000_0000);
        assert_eq!(segment.offset, [-1; 5]);
        assert_eq!(segment.if_data[0].name, "XCP");
        assert_eq!(mod_par.system_constant.len(), 2);

        let speed = module.measurement.get("engine_speed").unwrap();
        assert_eq!(speed.datatype, DataType::Uword);
        assert_eq!(speed.ecu_address, Some(0xD000_1000));
        let matrix_dim = speed.matrix_dim.as_ref().unwrap();
        assert_eq!(
            (matrix_dim.x_dim, matrix_dim.y_dim, matrix_dim.z_dim),
            (7, 8, 10)
        );
        assert!(speed.read_write);
        assert!(speed.discrete);
        assert_eq!(speed.if_data.len(), 1);

        let load = module.measurement.get("load").unwrap();
        assert_eq!(load.lower_limit, -1e-5);
        assert_eq!(load.upper_limit, 1.5e12);
        assert_eq!(load.phys_unit.as_deref(), Some("%"));

        let map = module.characteristic.get("ignition_map").unwrap();
        assert_eq!(map.characteristic_type, CharacteristicType::Map);
        assert_eq!(map.axis_descr.len(), 2);
        assert_eq!(
            map.axis_descr[0].fix_axis_par_list,
            Some(vec![0.0, 1000.0, 2000.0, 4000.0])
        );
        let annotation_text = map.annotation[0].text.as_ref().unwrap();
        assert_eq!(
            annotation_text[1],
            "second line with a tab\tand a \"quote\""
        );

        let vtab = module.compu_vtab.get("VT_STATUS").unwrap();
        assert_eq!(vtab.number_value_pairs, 4);
        assert_eq!(vtab.value_pairs.len(), 4);
        assert_eq!(vtab.value_pairs[3].out_val, "error \"E\"");
        assert_eq!(vtab.default_value.as_deref(), Some("invalid"));

        let temp = module.compu_tab.get("CT_TEMP").unwrap();
        assert_eq!(temp.tab_entry[1].out_val, 25.5);
        assert_eq!(temp.default_value_numeric, Some(-273.15));

        let range = module.compu_vtab_range.get("VTR_LOAD").unwrap();
        assert_eq!(range.value_triples[1].out_val, "full load");

        let group = module.group.get("engine").unwrap();
        assert!(group.root);
        assert_eq!(
            group.ref_measurement,
            Some(vec![
                "engine_speed".to_string(),
                "load".to_string(),
                "status".to_string()
            ])
        );
    }

    #[test]
    fn a2l_roundtrip() {
        let a2l_file = load_engine();
        let text = write_a2l(&a2l_file);

        let (reloaded, diagnostics) = load_from_string(&text).unwrap();
        assert!(diagnostics.is_empty(), "{diagnostics:#?}");
        assert_eq!(reloaded, a2l_file);

        // the written text is stable
        assert_eq!(reloaded.write_to_string(), text);
        let matrix_dim = reloaded.project.module[0].measurement[0]
            .matrix_dim
            .as_ref()
            .unwrap();
        assert_eq!(
            (matrix_dim.x_dim, matrix_dim.y_dim, matrix_dim.z_dim),
            (7, 8, 10)
        );
    }

    #[test]
    fn written_text_layout() {
        let a2l_file = load_engine();
        let text = write_a2l(&a2l_file);
        // comments are not kept
        assert!(text.starts_with("ASAP2_VERSION 1 71\nA2ML_VERSION 1 31\n/begin PROJECT engine"));
        assert!(text.contains("\n    /begin MEASUREMENT engine_speed \"engine speed\" UWORD CM_RPM 1 100 0 8000\n"));
        assert!(text.contains("\n      ECU_ADDRESS 0xD0001000\n"));
        assert!(text.contains("\n      MATRIX_DIM 7 8 10\n"));
        assert!(text.contains("\n      3 \"error \\\"E\\\"\"\n"));
        assert!(text.contains(" -1e-5 1.5e12"));
        // IF_DATA content keeps the order of values and nested blocks
        assert!(text.contains(
            "\n      /end PROTOCOL_LAYER\n      EVENT 1 \"10ms\" 2.5\n    /end IF_DATA\n"
        ));
        assert!(text.ends_with("/end PROJECT\n"));
    }

    #[test]
    fn json_cross_format_equality() {
        let a2l_file = load_engine();
        let json = to_json(&a2l_file).unwrap();

        let (reloaded, _) = load_from_string(&write_a2l(&a2l_file)).unwrap();
        assert_eq!(to_json(&reloaded).unwrap(), json);

        let restored = from_json(&json).unwrap();
        assert_eq!(restored, a2l_file);
    }

    #[test]
    fn a2l_json_a2l_json() {
        let json_1 = load_engine().to_json().unwrap();
        let a2l_text = A2lFile::from_json(&json_1).unwrap().write_to_string();
        let (reparsed, diagnostics) = load_from_string(&a2l_text).unwrap();
        assert!(diagnostics.is_empty());
        let json_2 = reparsed.to_json().unwrap();
        assert_eq!(json_1, json_2);
        assert!(json_2.contains("\"x_dim\": 7"));
        assert!(json_2.contains("\"y_dim\": 8"));
        assert!(json_2.contains("\"z_dim\": 10"));
    }

    #[test]
    fn raw_content_from_json() {
        let mut a2l_file = new();
        let json = r#"{
            "name": "XCP",
            "content": [
                { "tag": "PROTOCOL_LAYER", "content": [ { "type": "number", "value": "1" } ] },
                { "type": "identifier", "value": "EVENT" },
                { "type": "number", "value": "2" }
            ]
        }"#;
        let if_data: IfData = serde_json::from_str(json).unwrap();
        a2l_file.project.module[0].if_data.push(if_data);

        let text = a2l_file.write_to_string();
        let layer = text.find("/begin PROTOCOL_LAYER 1").unwrap();
        let event = text.find("EVENT 2").unwrap();
        assert!(layer < event);

        let (reloaded, diagnostics) = load_from_string(&text).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(reloaded, a2l_file);
    }

    #[test]
    fn string_escapes() {
        let text = r#"/begin PROJECT p "a\\b \"c\" \'d\' \n \r \t \x"
  /begin MODULE m ""
  /end MODULE
/end PROJECT"#;
        let (a2l_file, diagnostics) = load_from_string(text).unwrap();
        assert!(diagnostics.is_empty());
        // unknown escape sequences lose their backslash
        assert_eq!(
            a2l_file.project.long_identifier,
            "a\\b \"c\" 'd' \n \r \t x"
        );

        let written = a2l_file.write_to_string();
        assert!(written.starts_with(r#"/begin PROJECT p "a\\b \"c\" \'d\' \n \r \t x""#));
        let (reloaded, _) = load_from_string(&written).unwrap();
        assert_eq!(reloaded.project.long_identifier, a2l_file.project.long_identifier);

        let json = to_json(&a2l_file).unwrap();
        assert!(json.contains(r#""long_identifier": "a\\b \"c\" 'd' \n \r \t x""#));
        assert_eq!(from_json(&json).unwrap(), a2l_file);
    }

    #[test]
    fn unknown_keywords_are_preserved() {
        let text = r#"/begin PROJECT p ""
  /begin MODULE m ""
    /begin MEASUREMENT meas "" UBYTE NO_COMPU_METHOD 1 0 0 255
      VENDOR_SCALING 1.5 0x10 "text"
      /begin VENDOR_BLOCK inner
        NESTED_FLAG
      /end VENDOR_BLOCK
    /end MEASUREMENT
  /end MODULE
/end PROJECT"#;
        let (a2l_file, diagnostics) = load_from_string(text).unwrap();
        assert_eq!(diagnostics.len(), 2);
        assert!(
            diagnostics
                .iter()
                .all(|diagnostic| diagnostic.kind == DiagnosticKind::UnknownKeyword
                    && diagnostic.severity == Severity::Warning)
        );
        assert_eq!(diagnostics[0].location, Location::new(4, 7));
        assert_eq!(diagnostics[1].location, Location::new(5, 7));

        let unknown = &a2l_file.project.module[0].measurement[0].unknown;
        assert_eq!(unknown.len(), 2);
        assert_eq!(unknown[0].tag, "VENDOR_SCALING");
        assert!(!unknown[0].is_block);
        assert_eq!(
            unknown[0].params().cloned().collect::<Vec<_>>(),
            vec![
                RawValue::Number("1.5".to_string()),
                RawValue::Number("0x10".to_string()),
                RawValue::String("text".to_string()),
            ]
        );
        assert_eq!(unknown[1].tag, "VENDOR_BLOCK");
        assert!(unknown[1].is_block);
        // the content of an unknown block is not interpreted
        assert_eq!(
            unknown[1].content,
            vec![
                RawItem::Value(RawValue::Identifier("inner".to_string())),
                RawItem::Value(RawValue::Identifier("NESTED_FLAG".to_string()))
            ]
        );
        assert_eq!(unknown[1].blocks().count(), 0);

        // both writers keep the unknown content
        let (reloaded, _) = load_from_string(&a2l_file.write_to_string()).unwrap();
        assert_eq!(reloaded, a2l_file);
        let json = a2l_file.to_json().unwrap();
        assert!(json.contains(r#""tag": "VENDOR_SCALING""#));
        assert_eq!(A2lFile::from_json(&json).unwrap(), a2l_file);
    }

    #[test]
    fn diagnostic_order() {
        let text = r#"/begin PROJECT p ""
  /begin MODULE m ""
  /end FOO
    /begin MEASUREMENT x "" UBYTE NO_COMPU_METHOD 1 0 0
    /end MEASUREMENT
  /end MODULE
/end PROJECT"#;
        let mut received = Vec::new();
        let mut parser = Parser::new();
        parser.set_event_handler(|diagnostic: &Diagnostic| {
            received.push((diagnostic.kind, diagnostic.location.line));
            Ok(())
        });
        let (a2l_file, diagnostics) = parser.parse_str(text).unwrap();
        drop(parser);

        assert_eq!(
            received,
            vec![
                (DiagnosticKind::SyntaxError, 3),
                (DiagnosticKind::SchemaViolation, 4)
            ]
        );
        assert_eq!(diagnostics[0].message, "/end FOO does not match any open block");
        assert!(diagnostics[1].message.contains("upper_limit"));
        assert_eq!(diagnostics[1].severity, Severity::Error);

        // the parse recovers: the measurement exists with a default upper limit
        let measurement = a2l_file.project.module[0].measurement.get("x").unwrap();
        assert_eq!(measurement.upper_limit, 0.0);
    }

    #[test]
    fn handler_aborts_parse() {
        let text = r#"/begin PROJECT p ""
  /begin MODULE m ""
    /begin MEASUREMENT x "" UBYTE NO_COMPU_METHOD 1 0 0
    /end MEASUREMENT
    UNKNOWN_1
    UNKNOWN_2
  /end MODULE
/end PROJECT"#;
        let mut count = 0;
        let mut parser = Parser::new();
        parser.set_event_handler(|diagnostic: &Diagnostic| {
            count += 1;
            if diagnostic.kind == DiagnosticKind::SchemaViolation {
                Err(format!("rejected: {}", diagnostic.message).into())
            } else {
                Ok(())
            }
        });
        let result = parser.parse_str(text);
        drop(parser);

        assert_eq!(count, 1);
        match result {
            Err(A2lError::EventHandlerError { diagnostic, source }) => {
                assert_eq!(diagnostic.location.line, 3);
                assert!(source.to_string().starts_with("rejected: "));
            }
            _ => panic!("expected the handler to abort the parse"),
        }
    }

    #[test]
    fn load_encoded_files() {
        let dir = tempdir().unwrap();
        let expected = load_engine();
        for charset in [
            Charset::Utf8,
            Charset::Utf16Le,
            Charset::Utf16Be,
            Charset::Utf32Le,
            Charset::Utf32Be,
        ] {
            let path = dir.path().join(format!("engine_{charset}.a2l"));
            std::fs::write(&path, charset.encode(ENGINE_A2L)).unwrap();
            let (a2l_file, diagnostics) = load(&path).unwrap();
            assert!(diagnostics.is_empty(), "{charset}: {diagnostics:#?}");
            assert_eq!(a2l_file, expected, "{charset}");
        }

        let result = load(dir.path().join("missing.a2l"));
        assert!(matches!(result, Err(A2lError::FileOpenError { .. })));
    }

    #[test]
    fn write_and_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("engine_out.a2l");
        let a2l_file = load_engine();
        a2l_file.write(&path, Some("generated by a test")).unwrap();

        let (reloaded, diagnostics) = load(&path).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(reloaded, a2l_file);
    }

    #[test]
    fn build_model_in_code() {
        let mut a2l_file = new();
        let module = &mut a2l_file.project.module[0];
        let mut measurement = Measurement::new("voltage", DataType::Sword, "CM_VOLT");
        measurement.upper_limit = 12.5;
        measurement.matrix_dim = Some(MatrixDim {
            x_dim: 2,
            y_dim: 3,
            z_dim: 1,
        });
        module.measurement.push(measurement);
        let mut method = CompuMethod::default();
        method.name = "CM_VOLT".to_string();
        method.conversion_type = ConversionType::Linear;
        method.format = "%4.1".to_string();
        method.coeffs_linear = Some(CoeffsLinear { a: 0.1, b: 0.0 });
        module.compu_method.push(method);

        let text = a2l_file.write_to_string();
        assert!(text.contains("/begin MEASUREMENT voltage \"\" SWORD CM_VOLT 0 0 0 12.5"));
        assert!(text.contains("MATRIX_DIM 2 3 1"));
        assert!(text.contains("COEFFS_LINEAR 0.1 0"));
        let (reloaded, diagnostics) = load_from_string(&text).unwrap();
        assert!(diagnostics.is_empty(), "{diagnostics:#?}");
        assert_eq!(reloaded, a2l_file);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn cli_conversion_with_bom() {
        use clap::Parser as _;
        use std::io::Cursor;

        let dir = tempdir().unwrap();
        let json_path = dir.path().join("engine.json");
        let a2l_path = dir.path().join("engine_out.a2l");

        let args = cli::Cli::try_parse_from([
            "a2ljson",
            "--a2l",
            "-o",
            json_path.to_str().unwrap(),
            "-c",
            "UTF-16BE",
        ])
        .unwrap();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        cli::run(
            &args,
            &mut Cursor::new(ENGINE_A2L),
            &mut stdout,
            &mut stderr,
        )
        .unwrap();
        assert!(stdout.is_empty());
        assert!(stderr.is_empty());
        let json_data = std::fs::read(&json_path).unwrap();
        assert_eq!(json_data[..2], [0xFE, 0xFF]);

        // json back to a2l, read from the utf-16 encoded file
        let args = cli::Cli::try_parse_from([
            "a2ljson",
            "--json",
            "-o",
            a2l_path.to_str().unwrap(),
            "-c",
            "UTF-8",
        ])
        .unwrap();
        cli::run(
            &args,
            &mut Cursor::new(json_data),
            &mut stdout,
            &mut stderr,
        )
        .unwrap();
        let a2l_data = std::fs::read(&a2l_path).unwrap();
        assert_eq!(a2l_data[..3], [0xEF, 0xBB, 0xBF]);

        let (reloaded, diagnostics) = load(&a2l_path).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(reloaded, load_engine());
    }
}
