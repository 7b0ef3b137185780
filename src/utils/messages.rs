//! Mensajes localizados que ve el operador
//!
//! La consola muestra estos textos tal cual en los avisos y junto a los campos.

pub const REQUIRED_FIELD: &str = "Обязательное поле";
pub const SELECT_CUSTOMER: &str = "Выберите заказчика";
pub const ADD_CUSTOMER: &str = "Добавьте хотя бы одного заказчика";
pub const SELECT_VEHICLE_WITH_DRIVER: &str = "Выберите автомобиль с назначенным водителем";
pub const INVALID_DATE: &str = "Укажите дату в формате ДД-ММ-ГГГГ";
pub const FILL_REQUIRED_FIELDS: &str = "Заполните все обязательные поля";

pub const ORDER_CREATED: &str = "Заказ создан";
pub const ORDER_UPDATED: &str = "Заказ обновлен";
pub const ORDER_DELETED: &str = "Заказ удалён";
pub const ORDER_CREATE_FAILED: &str = "Ошибка при создании заказа";
pub const ORDER_UPDATE_FAILED: &str = "Ошибка при обновлении заказа";
pub const ORDER_DELETE_FAILED: &str = "Ошибка при удалении заказа";
pub const ROUTE_SUGGESTED: &str = "Маршрут не добавлен. Добавьте этапы или подтвердите создание без маршрута";
pub const SUBMIT_IN_PROGRESS: &str = "Заказ уже отправляется";

pub const DRAFT_NOT_FOUND: &str = "Черновик заказа не найден";
pub const DRAFT_CLOSED: &str = "Форма заказа закрыта";
pub const STAGE_NOT_FOUND: &str = "Этап не найден";
pub const WAYPOINT_NOT_FOUND: &str = "Промежуточная точка не найдена";
pub const CUSTOMS_NOT_FOUND: &str = "Таможня не найдена";
pub const CUSTOMER_ITEM_NOT_FOUND: &str = "Заказчик не найден";
pub const ATTACHMENT_NOT_FOUND: &str = "Файл не найден";
pub const STAGE_STARTED: &str = "Этап уже начат и не может быть удалён";
pub const LAST_CUSTOMER_ITEM: &str = "Должен быть минимум 1 заказчик";
pub const FIELD_LOCKED: &str = "Поле недоступно при редактировании заказа";
pub const ATTACHMENTS_LOCKED: &str = "Файлы можно прикрепить только к новому заказу";
pub const INVALID_VEHICLE: &str = "Некорректный автомобиль";
pub const INVALID_CUSTOMER: &str = "Некорректный заказчик";
pub const INVALID_WAYPOINT_TYPE: &str = "Тип точки: loading или unloading";

pub const SAVED: &str = "Изменения сохранены";
pub const CREATED: &str = "Запись создана";
pub const DELETED: &str = "Запись удалена";
pub const SAVE_FAILED: &str = "Ошибка при сохранении";
pub const DELETE_FAILED: &str = "Ошибка при удалении";
pub const LOAD_FAILED: &str = "Ошибка загрузки данных";
pub const UNKNOWN_RESOURCE: &str = "Неизвестный раздел справочника";
pub const RESOURCE_READ_ONLY: &str = "Раздел доступен только для просмотра";

pub const ROLE_NOT_FOUND: &str = "Роль не найдена";
pub const PERMISSIONS_SAVED: &str = "Права доступа обновлены";
pub const PERMISSIONS_SAVE_FAILED: &str = "Ошибка при сохранении прав";
pub const UNKNOWN_SECTION: &str = "Неизвестный раздел";
pub const TELEGRAM_SAVED: &str = "Настройки Telegram сохранены";
pub const TELEGRAM_SAVE_FAILED: &str = "Ошибка при сохранении настроек";
pub const TELEGRAM_CREDENTIALS_MISSING: &str = "Укажите токен бота и Chat ID";
pub const TELEGRAM_TEST_SENT: &str = "Тестовое сообщение отправлено в Telegram!";
pub const TELEGRAM_TEST_FAILED: &str = "Не удалось отправить сообщение";

pub const FILES_ADDED: &str = "Файлы добавлены";
pub const FILE_READ_FAILED: &str = "Ошибка загрузки файлов";
pub const FILE_UPLOAD_FAILED: &str = "Не удалось загрузить файл";

pub const SERVICE_UNREACHABLE: &str = "Сервис недоступен, попробуйте ещё раз";
pub const UNEXPECTED_ERROR: &str = "Произошла непредвиденная ошибка";

/// Роль по умолчанию, если консоль не передала роль пользователя
pub const DEFAULT_USER_ROLE: &str = "Пользователь";
