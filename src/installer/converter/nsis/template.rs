//! NSI script header template.
//!
//! Rendered with handlebars and escaping disabled; every value is escaped
//! for NSIS before it reaches the template.

pub const NSI_HEADER_TEMPLATE: &str = r#"; Generated by ypack {{generator_version}}. Do not edit by hand.
Unicode true

!define APP_NAME "{{app_name}}"
!define APP_VERSION "{{app_version}}"
!define APP_VERSION_VI "{{version_nsis}}"
!define APP_PUBLISHER "{{app_publisher}}"
{{#if app_description}}!define APP_DESCRIPTION "{{app_description}}"
{{/if}}!define REG_KEY "{{reg_key}}"
!define UNINSTALL_KEY "Software\Microsoft\Windows\CurrentVersion\Uninstall\${APP_NAME}"

VIProductVersion "${APP_VERSION_VI}"
VIAddVersionKey "ProductName" "${APP_NAME}"
VIAddVersionKey "ProductVersion" "${APP_VERSION}"
VIAddVersionKey "FileVersion" "${APP_VERSION}"
VIAddVersionKey "CompanyName" "${APP_PUBLISHER}"
VIAddVersionKey "LegalCopyright" "${APP_PUBLISHER}"
VIAddVersionKey "FileDescription" "${APP_NAME} Installer"

!include "MUI2.nsh"
!include "LogicLib.nsh"
!include "FileFunc.nsh"
!include "WinMessages.nsh"
!include "x64.nsh"
{{#if needs_winver}}!include "WinVer.nsh"
{{/if}}{{#each custom_includes}}!include "{{this}}"
{{/each}}
Name "${APP_NAME}"
OutFile "{{out_file}}"
InstallDir "{{install_dir}}"
InstallDirRegKey {{product_hive}} "${REG_KEY}" "InstallPath"
RequestExecutionLevel {{execution_level}}
SetCompressor /SOLID {{compression}}
ShowInstDetails show
ShowUnInstDetails show
{{#if silent_install}}SilentInstall silent
{{/if}}{{#if branding}}BrandingText "{{branding}}"
{{/if}}"#;
